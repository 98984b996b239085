//! Policy Analytics API
//!
//! Wire model and HTTP client for the backend.
//!
//! # Endpoints
//!
//! - `GET /health` - Backend status
//! - `POST /upload` - Multipart file upload (field `file`)
//! - `GET /files` - Uploaded files with summary and policies
//! - `GET /analytics/summary` - File and policy totals
//! - `GET /analytics/anomalies` - Anomalous file IDs
//! - `GET /analytics/policies` - Policy clusters
//! - `GET /enrich/topic?q=` - Web results for a policy
//! - `POST /login`, `POST /register` - Form credentials
//! - `GET /me` - Current user (bearer)
//! - `GET /comments/:file_id` - Comment thread
//! - `POST /comment` - New comment (form, bearer)

pub mod dto;
pub mod error;

#[cfg(feature = "native")]
pub mod client;

#[cfg(feature = "native")]
pub use client::HttpClient;
pub use error::{ClientError, ClientResult};

use async_trait::async_trait;

use crate::state::PendingUpload;

use dto::{
    AuthResponse, Comment, Credentials, EnrichResponse, FileRecord, HealthResponse, NewComment,
    Summary, UserProfile,
};

/// Thread-safety required of a [`DashboardApi`]: `Send + Sync` on native
/// targets, nothing in the single-threaded browser.
#[cfg(feature = "native")]
pub trait MaybeSend: Send + Sync {}
#[cfg(feature = "native")]
impl<T: Send + Sync> MaybeSend for T {}

#[cfg(not(feature = "native"))]
pub trait MaybeSend {}
#[cfg(not(feature = "native"))]
impl<T> MaybeSend for T {}

/// Every backend call the dashboard makes.
///
/// `HttpClient` is the native implementation. The browser front-end
/// implements it over `fetch`, so its futures are not `Send` there.
#[cfg_attr(feature = "native", async_trait)]
#[cfg_attr(not(feature = "native"), async_trait(?Send))]
pub trait DashboardApi: MaybeSend {
    async fn health(&self) -> ClientResult<HealthResponse>;

    /// Upload a file; returns the response body as compact JSON text
    async fn upload(&self, file: &PendingUpload) -> ClientResult<String>;

    async fn list_files(&self) -> ClientResult<Vec<FileRecord>>;

    async fn summary(&self) -> ClientResult<Summary>;

    async fn anomalies(&self) -> ClientResult<Vec<i64>>;

    async fn policy_clusters(&self) -> ClientResult<Vec<Vec<String>>>;

    async fn enrich_topic(&self, query: &str) -> ClientResult<EnrichResponse>;

    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse>;

    async fn register(&self, credentials: &Credentials) -> ClientResult<AuthResponse>;

    async fn me(&self, token: &str) -> ClientResult<UserProfile>;

    async fn comments(&self, file_id: i64) -> ClientResult<Vec<Comment>>;

    async fn add_comment(&self, token: &str, comment: &NewComment) -> ClientResult<AuthResponse>;
}
