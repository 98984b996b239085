//! # Policy Dashboard
//!
//! Client for the Data-Driven Policy analytics API: file upload, login,
//! comments, summary statistics, anomaly lists, policy clusters and topic
//! enrichment.
//!
//! The backend does all of the real work. This crate keeps a local,
//! serializable [`ViewState`] that mirrors the server's responses and
//! re-renders it as tables and charts.
//!
//! ## Modules
//!
//! - [`api`]: wire model, error types, the [`DashboardApi`] seam and (with
//!   `native`) the HTTP client
//! - [`state`]: view state, actions, the reducer and the store trait
//! - [`render`]: storage links, chart extraction and text rendering
//! - [`dashboard`]: controller that runs each user operation
//! - [`config`]: configuration file and environment overrides (`native`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use policy_dashboard::{Dashboard, HttpClient, RefreshTrigger};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpClient::new("http://localhost:8000", None)?;
//!     let mut dashboard = Dashboard::new(api);
//!
//!     // Initial load: files, summary, anomalies and clusters
//!     let report = dashboard.refresh(RefreshTrigger::Mount).await;
//!     println!("{} listing fetches failed", report.failures().len());
//!
//!     for file in &dashboard.state().files {
//!         println!("{} -> {}", file.filename, file.policies.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod dashboard;
pub mod render;
pub mod state;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod logging;

pub use api::dto::{
    AuthResponse, Comment, Credentials, EnrichmentResult, FileRecord, FileTypeCounts,
    HealthResponse, NewComment, Summary, UserProfile,
};

pub use state::{
    Action, AuthMode, CommentDraft, Notification, NotificationLevel, PendingUpload,
    RefreshTrigger, Resource, Session, StateStore, ViewState,
};

pub use render::{
    charts::{cluster_bar_chart, file_type_pie_chart, BarChart, PieChart},
    links::{display_url, StorageLinks},
};

pub use api::{ClientError, ClientResult, DashboardApi};

#[cfg(feature = "native")]
pub use api::HttpClient;

pub use dashboard::{AuthOutcome, CommentOutcome, Dashboard, RefreshReport};

#[cfg(feature = "native")]
pub use config::{ApiConfig, Config, ConfigError, LinksConfig, LoggingConfig};
