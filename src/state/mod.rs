//! State Management
//!
//! Serializable view state, the actions that change it, and the notification
//! queue that replaces blocking alerts.

pub mod action;
pub mod notify;
pub mod store;
pub mod view;

pub use action::{Action, AUTH_FAILED, COMMENT_FAILED, LOGIN_REQUIRED, REGISTERED_MESSAGE};
pub use notify::{Notification, NotificationLevel};
pub use store::StateStore;
pub use view::{
    guess_content_type, AuthMode, CommentDraft, CommentRejection, PendingUpload, RefreshTrigger,
    Resource, Session, ViewState,
};
