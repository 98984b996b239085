//! View State
//!
//! The dashboard's whole local state as one serializable record.
//! Hosts read it to render and change it only by applying an
//! [`Action`](super::Action).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::notify::{Notification, NotificationLevel};
use crate::api::dto::{
    Comment, Credentials, EnrichmentResult, FileRecord, NewComment, Summary, UserProfile,
};

/// Whether the auth form logs in or registers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    /// Label for the submit button
    pub fn label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }
}

/// Logged-in session, memory only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Filled in once `GET /me` answers
    pub user: Option<UserProfile>,
}

/// File chosen for upload, read into memory by the host
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: u64,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl PendingUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self {
            size: bytes.len() as u64,
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a local file
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

impl fmt::Debug for PendingUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish()
    }
}

/// MIME type for the extensions the backend can parse
pub fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

/// Unsent comment text for one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentDraft {
    pub content: String,
    /// Policy the comment refers to, sent as `policy_text`
    #[serde(default)]
    pub policy_text: Option<String>,
}

/// Event that starts a listing refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    Mount,
    UploadCompleted,
}

/// The four listings fetched on every refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Files,
    Summary,
    Anomalies,
    PolicyClusters,
}

impl Resource {
    /// Endpoint the listing is fetched from
    pub fn path(self) -> &'static str {
        match self {
            Resource::Files => "/files",
            Resource::Summary => "/analytics/summary",
            Resource::Anomalies => "/analytics/anomalies",
            Resource::PolicyClusters => "/analytics/policies",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Files => write!(f, "files"),
            Resource::Summary => write!(f, "summary"),
            Resource::Anomalies => write!(f, "anomalies"),
            Resource::PolicyClusters => write!(f, "policy clusters"),
        }
    }
}

/// Why a comment was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentRejection {
    /// No session; the user gets one error notification
    LoginRequired,
    /// Blank draft; silently ignored
    EmptyDraft,
}

/// Local mirror of everything the dashboard shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Last `status` from `GET /health`
    pub health: String,

    pub pending_upload: Option<PendingUpload>,
    /// Raw body of the last upload response
    pub upload_result: String,

    pub files: Vec<FileRecord>,
    pub summary: Option<Summary>,
    pub anomalies: Vec<i64>,
    pub policy_clusters: Vec<Vec<String>>,

    /// Keyed by the literal policy text
    pub enrichment: BTreeMap<String, Vec<EnrichmentResult>>,
    pub comments: BTreeMap<i64, Vec<Comment>>,
    pub comment_drafts: BTreeMap<i64, CommentDraft>,

    pub username: String,
    #[serde(skip)]
    pub password: String,
    pub auth_mode: AuthMode,
    pub session: Option<Session>,

    pub notifications: Vec<Notification>,

    /// Stamp of the most recently started refresh
    pub refresh_generation: u64,
    /// Generation of the result currently held per listing
    pub applied_generations: BTreeMap<Resource, u64>,

    next_notification_id: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the current session, if any
    pub fn token(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|s| s.token.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub fn enrichment_for(&self, policy: &str) -> Option<&[EnrichmentResult]> {
        self.enrichment.get(policy).map(Vec::as_slice)
    }

    pub fn comments_for(&self, file_id: i64) -> &[Comment] {
        self.comments
            .get(&file_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn comment_draft(&self, file_id: i64) -> &str {
        self.comment_drafts
            .get(&file_id)
            .map(|d| d.content.as_str())
            .unwrap_or("")
    }

    pub fn is_anomalous(&self, file_id: i64) -> bool {
        self.anomalies.contains(&file_id)
    }

    /// Build the request for `file_id`'s draft.
    ///
    /// The token check comes first: a logged-out user with a blank draft
    /// still needs to be told to log in.
    pub fn prepare_comment(&self, file_id: i64) -> Result<(String, NewComment), CommentRejection> {
        let token = self.token().ok_or(CommentRejection::LoginRequired)?;

        let draft = self
            .comment_drafts
            .get(&file_id)
            .filter(|d| !d.content.trim().is_empty())
            .ok_or(CommentRejection::EmptyDraft)?;

        Ok((
            token.to_string(),
            NewComment {
                file_id,
                content: draft.content.clone(),
                policy_text: draft.policy_text.clone(),
            },
        ))
    }

    /// Remove and return all queued notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub(crate) fn push_notification(&mut self, level: NotificationLevel, message: String) {
        self.next_notification_id += 1;
        self.notifications.push(Notification {
            id: self.next_notification_id,
            level,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_auth_mode_toggle() {
        assert_eq!(AuthMode::default(), AuthMode::Login);
        assert_eq!(AuthMode::Login.toggled(), AuthMode::Register);
        assert_eq!(AuthMode::Register.toggled(), AuthMode::Login);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("report.PDF"), Some("application/pdf"));
        assert_eq!(guess_content_type("data.csv"), Some("text/csv"));
        assert_eq!(guess_content_type("noext"), None);
        assert_eq!(guess_content_type("archive.zip"), None);
    }

    #[test]
    fn test_pending_upload_from_path() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"a,b\n1,2\n").unwrap();

        let upload = PendingUpload::from_path(file.path()).unwrap();
        assert_eq!(upload.size, 8);
        assert_eq!(upload.content_type.as_deref(), Some("text/csv"));
        assert!(upload.file_name.ends_with(".csv"));
    }

    #[test]
    fn test_prepare_comment_requires_token_first() {
        let state = ViewState::new();
        assert_eq!(
            state.prepare_comment(1).unwrap_err(),
            CommentRejection::LoginRequired
        );
    }

    #[test]
    fn test_prepare_comment_rejects_blank() {
        let mut state = ViewState::new();
        state.session = Some(Session {
            token: "t".to_string(),
            user: None,
        });
        state.comment_drafts.insert(
            3,
            CommentDraft {
                content: "   \n".to_string(),
                policy_text: None,
            },
        );

        assert_eq!(state.prepare_comment(3).unwrap_err(), CommentRejection::EmptyDraft);
        assert_eq!(state.prepare_comment(4).unwrap_err(), CommentRejection::EmptyDraft);
    }

    #[test]
    fn test_empty_token_is_logged_out() {
        let mut state = ViewState::new();
        state.session = Some(Session {
            token: String::new(),
            user: None,
        });
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_snapshot_omits_password_and_bytes() {
        let mut state = ViewState::new();
        state.password = "hunter2".to_string();
        state.pending_upload = Some(PendingUpload::new("a.pdf", vec![1, 2, 3]));

        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("hunter2"));

        let restored: ViewState = serde_json::from_str(&json).unwrap();
        let upload = restored.pending_upload.unwrap();
        assert_eq!(upload.size, 3);
        assert!(upload.bytes.is_empty());
    }
}
