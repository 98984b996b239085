//! State Management
//!
//! Reactive wrapper around the shared view state.

pub mod global;

pub use global::{provide_global_state, use_dashboard, DashboardState};
