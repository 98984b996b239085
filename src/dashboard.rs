//! Dashboard Controller
//!
//! Runs each user operation against a [`DashboardApi`] and folds the
//! responses into a [`StateStore`] through the reducer. The terminal host
//! owns a plain [`ViewState`]; the browser host passes its signal.
//!
//! Error policy:
//! - transport and decode failures are returned to the caller;
//! - server rejections on auth and comment endpoints become error
//!   notifications;
//! - a failed listing fetch leaves that cache stale and is reported in the
//!   [`RefreshReport`] without touching the other three.

use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::api::dto::{upload_error, FileRecord, Summary};
use crate::api::{ClientError, ClientResult, DashboardApi};
use crate::state::{
    Action, AuthMode, CommentRejection, Notification, PendingUpload, RefreshTrigger, Resource,
    StateStore, ViewState, AUTH_FAILED, COMMENT_FAILED, LOGIN_REQUIRED,
};

#[cfg(feature = "native")]
type ListingFuture<'a> = futures_util::future::BoxFuture<'a, Listing>;
#[cfg(not(feature = "native"))]
type ListingFuture<'a> = futures_util::future::LocalBoxFuture<'a, Listing>;

/// Result of submitting the auth form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    LoggedIn,
    Registered,
    Rejected(String),
}

/// Result of [`Dashboard::add_comment`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    Posted,
    /// Blank draft, nothing sent
    EmptyDraft,
    /// No session, nothing sent
    LoginRequired,
    Rejected(String),
}

/// What happened to each listing during one refresh
#[derive(Debug)]
pub struct RefreshReport {
    pub trigger: RefreshTrigger,
    pub generation: u64,
    /// Listings replaced, in completion order
    pub loaded: Vec<Resource>,
    failures: Vec<(Resource, ClientError)>,
}

impl RefreshReport {
    fn new(trigger: RefreshTrigger, generation: u64) -> Self {
        Self {
            trigger,
            generation,
            loaded: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn failures(&self) -> &[(Resource, ClientError)] {
        &self.failures
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Listing {
    Files(ClientResult<Vec<FileRecord>>),
    Summary(ClientResult<Summary>),
    Anomalies(ClientResult<Vec<i64>>),
    Clusters(ClientResult<Vec<Vec<String>>>),
}

/// Dashboard state bound to a backend
pub struct Dashboard<A, S = ViewState> {
    api: A,
    store: S,
}

impl<A: DashboardApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self::with_store(api, ViewState::new())
    }

    pub fn state(&self) -> &ViewState {
        &self.store
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.store.take_notifications()
    }
}

impl<A: DashboardApi, S: StateStore> Dashboard<A, S> {
    pub fn with_store(api: A, store: S) -> Self {
        Self { api, store }
    }

    /// Apply a local-only action
    pub fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
    }

    // ============================================
    // Listings
    // ============================================

    /// Initial load
    pub async fn mount(&mut self) -> RefreshReport {
        self.refresh(RefreshTrigger::Mount).await
    }

    /// Fetch files, summary, anomalies and clusters concurrently, replacing
    /// each cache as its response arrives
    pub async fn refresh(&mut self, trigger: RefreshTrigger) -> RefreshReport {
        self.store.dispatch(Action::RefreshStarted(trigger));
        let generation = self.store.read(|s| s.refresh_generation);
        let mut report = RefreshReport::new(trigger, generation);

        let api = &self.api;
        let mut pending: FuturesUnordered<ListingFuture<'_>> = FuturesUnordered::new();
        pending.push(Box::pin(async move { Listing::Files(api.list_files().await) }));
        pending.push(Box::pin(async move { Listing::Summary(api.summary().await) }));
        pending.push(Box::pin(async move { Listing::Anomalies(api.anomalies().await) }));
        pending.push(Box::pin(async move {
            Listing::Clusters(api.policy_clusters().await)
        }));

        while let Some(listing) = pending.next().await {
            let (resource, outcome) = match listing {
                Listing::Files(r) => (
                    Resource::Files,
                    r.map(|files| Action::FilesLoaded { generation, files }),
                ),
                Listing::Summary(r) => (
                    Resource::Summary,
                    r.map(|summary| Action::SummaryLoaded {
                        generation,
                        summary,
                    }),
                ),
                Listing::Anomalies(r) => (
                    Resource::Anomalies,
                    r.map(|anomalies| Action::AnomaliesLoaded {
                        generation,
                        anomalies,
                    }),
                ),
                Listing::Clusters(r) => (
                    Resource::PolicyClusters,
                    r.map(|clusters| Action::ClustersLoaded {
                        generation,
                        clusters,
                    }),
                ),
            };

            match outcome {
                Ok(action) => {
                    self.store.dispatch(action);
                    report.loaded.push(resource);
                }
                Err(e) => {
                    tracing::warn!(%resource, error = %e, "Listing fetch failed");
                    report.failures.push((resource, e));
                }
            }
        }

        tracing::debug!(
            ?trigger,
            generation,
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            "Refresh finished"
        );
        report
    }

    // ============================================
    // Health and upload
    // ============================================

    pub async fn check_health(&mut self) -> ClientResult<()> {
        let health = self.api.health().await?;
        self.store.dispatch(Action::HealthChecked(health.status));
        Ok(())
    }

    pub fn select_file(&mut self, file: PendingUpload) {
        self.store.dispatch(Action::FileSelected(file));
    }

    /// Upload the selected file, then refresh the listings once.
    ///
    /// Returns `None` when nothing is selected.
    pub async fn upload(&mut self) -> ClientResult<Option<RefreshReport>> {
        let Some(file) = self.store.read(|s| s.pending_upload.clone()) else {
            return Ok(None);
        };

        let body = self.api.upload(&file).await?;
        tracing::info!(file_name = %file.file_name, "Upload completed");

        if let Some(error) = upload_error(&body) {
            self.store.dispatch(Action::error(error));
        }
        self.store.dispatch(Action::UploadCompleted(body));

        Ok(Some(self.refresh(RefreshTrigger::UploadCompleted).await))
    }

    // ============================================
    // Enrichment
    // ============================================

    /// Look up web results for `policy` and store them under that exact text
    pub async fn enrich_policy(&mut self, policy: &str) -> ClientResult<()> {
        let response = self.api.enrich_topic(policy).await?;

        if let Some(error) = response.error {
            self.store.dispatch(Action::error(error));
        }
        self.store.dispatch(Action::EnrichmentLoaded {
            policy: policy.to_string(),
            results: response.results,
        });
        Ok(())
    }

    // ============================================
    // Auth
    // ============================================

    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.store.dispatch(Action::UsernameChanged(username.into()));
        self.store.dispatch(Action::PasswordChanged(password.into()));
    }

    pub fn toggle_auth_mode(&mut self) {
        self.store.dispatch(Action::AuthModeToggled);
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<AuthOutcome> {
        self.set_credentials(username, password);
        self.store.dispatch(Action::AuthModeSet(AuthMode::Login));
        self.submit_auth().await
    }

    pub async fn register(&mut self, username: &str, password: &str) -> ClientResult<AuthOutcome> {
        self.set_credentials(username, password);
        self.store.dispatch(Action::AuthModeSet(AuthMode::Register));
        self.submit_auth().await
    }

    /// Submit the auth form in its current mode
    pub async fn submit_auth(&mut self) -> ClientResult<AuthOutcome> {
        let (credentials, mode) = self.store.read(|s| (s.credentials(), s.auth_mode));

        match mode {
            AuthMode::Login => {
                let response = self.api.login(&credentials).await?;
                match response.token() {
                    Some(token) => {
                        let token = token.to_string();
                        self.store.dispatch(Action::LoggedIn {
                            token: token.clone(),
                        });
                        tracing::info!(username = %credentials.username, "Logged in");
                        self.load_profile(&token).await;
                        Ok(AuthOutcome::LoggedIn)
                    }
                    None => Ok(self.reject_auth(response.detail_or(AUTH_FAILED))),
                }
            }
            AuthMode::Register => {
                let response = self.api.register(&credentials).await?;
                if response.message().is_some() {
                    self.store.dispatch(Action::Registered);
                    tracing::info!(username = %credentials.username, "Registered");
                    Ok(AuthOutcome::Registered)
                } else {
                    Ok(self.reject_auth(response.detail_or(AUTH_FAILED)))
                }
            }
        }
    }

    async fn load_profile(&mut self, token: &str) {
        match self.api.me(token).await {
            Ok(profile) => self.store.dispatch(Action::ProfileLoaded(profile)),
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch failed");
                self.store
                    .dispatch(Action::error(format!("Could not load profile: {}", e)));
            }
        }
    }

    fn reject_auth(&mut self, message: String) -> AuthOutcome {
        tracing::debug!(%message, "Auth rejected");
        self.store.dispatch(Action::error(message.clone()));
        AuthOutcome::Rejected(message)
    }

    /// Forget the session; the server is not told
    pub fn logout(&mut self) {
        self.store.dispatch(Action::LoggedOut);
        tracing::info!("Logged out");
    }

    // ============================================
    // Comments
    // ============================================

    pub async fn fetch_comments(&mut self, file_id: i64) -> ClientResult<()> {
        let comments = self.api.comments(file_id).await?;
        self.store
            .dispatch(Action::CommentsLoaded { file_id, comments });
        Ok(())
    }

    pub fn set_comment_draft(&mut self, file_id: i64, content: impl Into<String>) {
        self.store.dispatch(Action::CommentDraftChanged {
            file_id,
            content: content.into(),
        });
    }

    pub fn tag_comment_policy(&mut self, file_id: i64, policy_text: Option<String>) {
        self.store.dispatch(Action::CommentPolicyTagged {
            file_id,
            policy_text,
        });
    }

    /// Post the draft for `file_id` and reload its thread
    pub async fn add_comment(&mut self, file_id: i64) -> ClientResult<CommentOutcome> {
        let (token, comment) = match self.store.read(|s| s.prepare_comment(file_id)) {
            Ok(prepared) => prepared,
            Err(CommentRejection::LoginRequired) => {
                self.store.dispatch(Action::error(LOGIN_REQUIRED));
                return Ok(CommentOutcome::LoginRequired);
            }
            Err(CommentRejection::EmptyDraft) => return Ok(CommentOutcome::EmptyDraft),
        };

        let response = self.api.add_comment(&token, &comment).await?;
        if response.message().is_some() {
            self.store.dispatch(Action::CommentPosted { file_id });
            self.fetch_comments(file_id).await?;
            Ok(CommentOutcome::Posted)
        } else {
            let message = response.detail_or(COMMENT_FAILED);
            self.store.dispatch(Action::error(message.clone()));
            Ok(CommentOutcome::Rejected(message))
        }
    }

    // ============================================
    // Notifications
    // ============================================

    pub fn dismiss_notification(&mut self, id: u64) {
        self.store.dispatch(Action::NotificationDismissed(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_completeness() {
        let mut report = RefreshReport::new(RefreshTrigger::Mount, 1);
        report.loaded.push(Resource::Files);
        assert!(report.is_complete());

        report.failures.push((Resource::Summary, ClientError::Timeout));
        assert!(!report.is_complete());
        assert_eq!(report.failures()[0].0, Resource::Summary);
    }
}
