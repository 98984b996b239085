//! UI Components
//!
//! Leptos components for the dashboard.

pub mod analytics;
pub mod auth;
pub mod chart;
pub mod files;
pub mod header;
pub mod toast;
pub mod upload;

pub use analytics::AnalyticsPanel;
pub use auth::AuthPanel;
pub use files::FilesTable;
pub use header::Header;
pub use toast::Toast;
pub use upload::UploadPanel;
