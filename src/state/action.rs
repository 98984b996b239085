//! Actions and Reducer
//!
//! Every change to [`ViewState`] goes through [`ViewState::apply`]. The
//! reducer does no I/O, so the whole dashboard can be driven and checked
//! without a network or a renderer.

use super::notify::NotificationLevel;
use super::view::{AuthMode, PendingUpload, RefreshTrigger, Resource, Session, ViewState};
use crate::api::dto::{Comment, EnrichmentResult, FileRecord, Summary, UserProfile};

/// Message shown after a successful registration
pub const REGISTERED_MESSAGE: &str = "Registration successful! Please log in.";
/// Login or register rejected without a reason
pub const AUTH_FAILED: &str = "Auth failed";
/// Comment rejected without a reason
pub const COMMENT_FAILED: &str = "Failed to add comment";
/// Commenting without a session
pub const LOGIN_REQUIRED: &str = "Login required";

/// A state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    HealthChecked(String),

    FileSelected(PendingUpload),
    UploadCompleted(String),

    /// Bumps the refresh generation; listing results carry the new value
    RefreshStarted(RefreshTrigger),
    FilesLoaded {
        generation: u64,
        files: Vec<FileRecord>,
    },
    SummaryLoaded {
        generation: u64,
        summary: Summary,
    },
    AnomaliesLoaded {
        generation: u64,
        anomalies: Vec<i64>,
    },
    ClustersLoaded {
        generation: u64,
        clusters: Vec<Vec<String>>,
    },

    EnrichmentLoaded {
        policy: String,
        results: Vec<EnrichmentResult>,
    },

    UsernameChanged(String),
    PasswordChanged(String),
    AuthModeToggled,
    AuthModeSet(AuthMode),
    LoggedIn {
        token: String,
    },
    ProfileLoaded(UserProfile),
    Registered,
    LoggedOut,

    CommentDraftChanged {
        file_id: i64,
        content: String,
    },
    CommentPolicyTagged {
        file_id: i64,
        policy_text: Option<String>,
    },
    CommentsLoaded {
        file_id: i64,
        comments: Vec<Comment>,
    },
    CommentPosted {
        file_id: i64,
    },

    Notify {
        level: NotificationLevel,
        message: String,
    },
    NotificationDismissed(u64),
}

impl Action {
    pub fn error(message: impl Into<String>) -> Self {
        Action::Notify {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Action::Notify {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }
}

impl ViewState {
    /// Apply one action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::HealthChecked(status) => self.health = status,

            Action::FileSelected(upload) => self.pending_upload = Some(upload),
            // The selection is kept so the same file can be sent again
            Action::UploadCompleted(body) => self.upload_result = body,

            Action::RefreshStarted(trigger) => {
                self.refresh_generation += 1;
                tracing::debug!(?trigger, generation = self.refresh_generation, "Refresh started");
            }
            Action::FilesLoaded { generation, files } => {
                if self.accept(Resource::Files, generation) {
                    self.files = files;
                }
            }
            Action::SummaryLoaded {
                generation,
                summary,
            } => {
                if self.accept(Resource::Summary, generation) {
                    self.summary = Some(summary);
                }
            }
            Action::AnomaliesLoaded {
                generation,
                anomalies,
            } => {
                if self.accept(Resource::Anomalies, generation) {
                    self.anomalies = anomalies;
                }
            }
            Action::ClustersLoaded {
                generation,
                clusters,
            } => {
                if self.accept(Resource::PolicyClusters, generation) {
                    self.policy_clusters = clusters;
                }
            }

            Action::EnrichmentLoaded { policy, results } => {
                self.enrichment.insert(policy, results);
            }

            Action::UsernameChanged(username) => self.username = username,
            Action::PasswordChanged(password) => self.password = password,
            Action::AuthModeToggled => self.auth_mode = self.auth_mode.toggled(),
            Action::AuthModeSet(mode) => self.auth_mode = mode,
            Action::LoggedIn { token } => {
                self.session = Some(Session { token, user: None });
            }
            Action::ProfileLoaded(profile) => {
                // A logout may have landed while /me was in flight
                if let Some(session) = self.session.as_mut() {
                    session.user = Some(profile);
                }
            }
            Action::Registered => {
                self.auth_mode = AuthMode::Login;
                self.push_notification(NotificationLevel::Success, REGISTERED_MESSAGE.to_string());
            }
            Action::LoggedOut => self.session = None,

            Action::CommentDraftChanged { file_id, content } => {
                self.comment_drafts.entry(file_id).or_default().content = content;
            }
            Action::CommentPolicyTagged {
                file_id,
                policy_text,
            } => {
                self.comment_drafts.entry(file_id).or_default().policy_text = policy_text;
            }
            Action::CommentsLoaded { file_id, comments } => {
                self.comments.insert(file_id, comments);
            }
            Action::CommentPosted { file_id } => {
                self.comment_drafts.remove(&file_id);
            }

            Action::Notify { level, message } => self.push_notification(level, message),
            Action::NotificationDismissed(id) => self.notifications.retain(|n| n.id != id),
        }
    }

    /// Whether a listing result of `generation` may replace the cached one
    fn accept(&mut self, resource: Resource, generation: u64) -> bool {
        let applied = self.applied_generations.entry(resource).or_insert(0);
        if generation < *applied {
            tracing::debug!(%resource, generation, applied = *applied, "Dropping stale listing");
            return false;
        }
        *applied = generation;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CommentRejection;

    fn file(id: i64, name: &str) -> FileRecord {
        FileRecord {
            id,
            filename: name.to_string(),
            file_url: None,
            content_type: None,
            upload_time: None,
            summary: None,
            policies: vec![],
        }
    }

    fn result(name: &str) -> EnrichmentResult {
        EnrichmentResult {
            url: format!("https://example.com/{}", name),
            name: name.to_string(),
            snippet: String::new(),
        }
    }

    #[test]
    fn test_refresh_replaces_listings() {
        let mut state = ViewState::new();
        state.apply(Action::RefreshStarted(RefreshTrigger::Mount));
        state.apply(Action::FilesLoaded {
            generation: 1,
            files: vec![file(1, "a.pdf"), file(2, "b.pdf")],
        });
        state.apply(Action::RefreshStarted(RefreshTrigger::UploadCompleted));
        state.apply(Action::FilesLoaded {
            generation: 2,
            files: vec![file(3, "c.pdf")],
        });

        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files[0].id, 3);
    }

    #[test]
    fn test_stale_listing_dropped() {
        let mut state = ViewState::new();
        state.apply(Action::RefreshStarted(RefreshTrigger::Mount));
        state.apply(Action::RefreshStarted(RefreshTrigger::UploadCompleted));

        // Newer refresh answers first
        state.apply(Action::AnomaliesLoaded {
            generation: 2,
            anomalies: vec![7],
        });
        state.apply(Action::AnomaliesLoaded {
            generation: 1,
            anomalies: vec![1, 2],
        });

        assert_eq!(state.anomalies, vec![7]);

        // Other resources are tracked separately
        state.apply(Action::ClustersLoaded {
            generation: 1,
            clusters: vec![vec!["a".to_string()]],
        });
        assert_eq!(state.policy_clusters.len(), 1);
    }

    #[test]
    fn test_enrichment_replaces_not_appends() {
        let mut state = ViewState::new();
        state.apply(Action::EnrichmentLoaded {
            policy: "Data Retention".to_string(),
            results: vec![result("one"), result("two")],
        });
        state.apply(Action::EnrichmentLoaded {
            policy: "Data Retention".to_string(),
            results: vec![result("three")],
        });

        assert_eq!(state.enrichment.len(), 1);
        let stored = state.enrichment_for("Data Retention").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "three");
    }

    #[test]
    fn test_upload_keeps_selection() {
        let mut state = ViewState::new();
        state.apply(Action::FileSelected(PendingUpload::new("a.pdf", vec![0; 4])));
        state.apply(Action::UploadCompleted(r#"{"filename":"a.pdf"}"#.to_string()));

        assert!(state.pending_upload.is_some());
        assert_eq!(state.upload_result, r#"{"filename":"a.pdf"}"#);
    }

    #[test]
    fn test_login_then_profile_then_logout() {
        let mut state = ViewState::new();
        state.apply(Action::LoggedIn {
            token: "abc".to_string(),
        });
        assert_eq!(state.token(), Some("abc"));
        assert!(state.user().is_none());

        state.apply(Action::ProfileLoaded(UserProfile {
            username: "ana".to_string(),
            role: Some("user".to_string()),
        }));
        assert_eq!(state.user().unwrap().username, "ana");

        state.apply(Action::LoggedOut);
        assert!(state.session.is_none());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_profile_after_logout_ignored() {
        let mut state = ViewState::new();
        state.apply(Action::ProfileLoaded(UserProfile {
            username: "ana".to_string(),
            role: None,
        }));
        assert!(state.session.is_none());
    }

    #[test]
    fn test_registered_switches_to_login() {
        let mut state = ViewState::new();
        state.apply(Action::AuthModeToggled);
        assert_eq!(state.auth_mode, AuthMode::Register);

        state.apply(Action::Registered);
        assert_eq!(state.auth_mode, AuthMode::Login);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].level, NotificationLevel::Success);
        assert_eq!(state.notifications[0].message, REGISTERED_MESSAGE);
    }

    #[test]
    fn test_comment_draft_lifecycle() {
        let mut state = ViewState::new();
        state.apply(Action::LoggedIn {
            token: "t".to_string(),
        });
        state.apply(Action::CommentDraftChanged {
            file_id: 5,
            content: "Looks off".to_string(),
        });
        state.apply(Action::CommentPolicyTagged {
            file_id: 5,
            policy_text: Some("Data Retention".to_string()),
        });

        let (token, comment) = state.prepare_comment(5).unwrap();
        assert_eq!(token, "t");
        assert_eq!(comment.content, "Looks off");
        assert_eq!(comment.policy_text.as_deref(), Some("Data Retention"));

        state.apply(Action::CommentPosted { file_id: 5 });
        assert_eq!(state.comment_draft(5), "");
        assert_eq!(state.prepare_comment(5).unwrap_err(), CommentRejection::EmptyDraft);
    }

    #[test]
    fn test_comments_replace_thread() {
        let mut state = ViewState::new();
        let comment = |content: &str| Comment {
            user: "ana".to_string(),
            timestamp: None,
            content: content.to_string(),
            policy_text: None,
        };

        state.apply(Action::CommentsLoaded {
            file_id: 1,
            comments: vec![comment("first")],
        });
        state.apply(Action::CommentsLoaded {
            file_id: 1,
            comments: vec![comment("second"), comment("first")],
        });

        let thread = state.comments_for(1);
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].content, "second");
        assert!(state.comments_for(2).is_empty());
    }

    #[test]
    fn test_notifications_get_unique_ids() {
        let mut state = ViewState::new();
        state.apply(Action::error("one"));
        state.apply(Action::success("two"));

        let ids: Vec<_> = state.notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);

        state.apply(Action::NotificationDismissed(1));
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].message, "two");

        let drained = state.take_notifications();
        assert_eq!(drained.len(), 1);
        assert!(state.notifications.is_empty());

        state.apply(Action::error("three"));
        assert_eq!(state.notifications[0].id, 3);
    }
}
