//! Policy Analytics API
//!
//! Browser-side HTTP calls. Response types are shared with the native client.

pub mod client;

pub use client::*;
