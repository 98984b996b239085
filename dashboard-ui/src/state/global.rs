//! Global Application State
//!
//! One reactive signal around the shared [`ViewState`]. User operations run
//! the same [`Dashboard`] controller as the terminal host, with this state
//! as its store, so every action lands in the signal as it is applied.

use leptos::*;
use wasm_bindgen_futures::JsFuture;

use policy_dashboard::{
    Action, Dashboard, NotificationLevel, PendingUpload, RefreshReport, RefreshTrigger,
    StateStore, ViewState,
};

use crate::api::GlooClient;

/// Toast lifetimes in milliseconds
const SUCCESS_TOAST_MS: u32 = 3000;
const ERROR_TOAST_MS: u32 = 5000;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct DashboardState {
    pub view: RwSignal<ViewState>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    provide_context(DashboardState {
        view: create_rw_signal(ViewState::new()),
    });
}

pub fn use_dashboard() -> DashboardState {
    expect_context::<DashboardState>()
}

impl StateStore for DashboardState {
    fn dispatch(&mut self, action: Action) {
        DashboardState::dispatch(self, action);
    }

    fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        self.view.with_untracked(f)
    }
}

impl DashboardState {
    /// Apply an action and schedule dismissal of any notification it raised
    pub fn dispatch(&self, action: Action) {
        let last_id = self
            .view
            .with_untracked(|s| s.notifications.iter().map(|n| n.id).max().unwrap_or(0));

        self.view.update(|s| s.apply(action));

        let raised: Vec<_> = self.view.with_untracked(|s| {
            s.notifications
                .iter()
                .filter(|n| n.id > last_id)
                .map(|n| (n.id, n.level))
                .collect()
        });

        for (id, level) in raised {
            let delay = match level {
                NotificationLevel::Error => ERROR_TOAST_MS,
                NotificationLevel::Success => SUCCESS_TOAST_MS,
            };
            let view = self.view;
            gloo_timers::callback::Timeout::new(delay, move || {
                view.update(|s| s.apply(Action::NotificationDismissed(id)));
            })
            .forget();
        }
    }

    pub fn show_error(&self, message: impl Into<String>) {
        self.dispatch(Action::error(message));
    }

    /// Controller for one operation, talking to the currently configured API
    fn controller(self) -> Dashboard<GlooClient, DashboardState> {
        Dashboard::with_store(GlooClient::from_storage(), self)
    }

    // ============ Listings ============

    /// Start the four listing fetches; each result is applied as it arrives
    pub fn refresh(&self, trigger: RefreshTrigger) {
        let state = *self;
        spawn_local(async move {
            let report = state.controller().refresh(trigger).await;
            log_refresh_failures(&report);
        });
    }

    pub fn check_health(&self) {
        let state = *self;
        spawn_local(async move {
            if let Err(e) = state.controller().check_health().await {
                web_sys::console::error_1(&format!("Health check failed: {}", e).into());
            }
        });
    }

    // ============ Upload ============

    /// Read the chosen file into memory and record it as the selection
    pub fn select_file(&self, file: web_sys::File) {
        let state = *self;
        spawn_local(async move {
            let buffer = match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => buffer,
                Err(_) => return state.show_error(format!("Could not read {}", file.name())),
            };

            let mut selection =
                PendingUpload::new(file.name(), js_sys::Uint8Array::new(&buffer).to_vec());
            let content_type = file.type_();
            if !content_type.is_empty() {
                selection.content_type = Some(content_type);
            }
            state.controller().select_file(selection);
        });
    }

    /// Upload the selected file, then refresh once; no-op without a selection
    pub fn upload(&self) {
        let state = *self;
        spawn_local(async move {
            match state.controller().upload().await {
                Ok(Some(report)) => log_refresh_failures(&report),
                Ok(None) => {}
                Err(e) => state.show_error(format!("Upload failed: {}", e)),
            }
        });
    }

    // ============ Enrichment ============

    pub fn enrich_policy(&self, policy: String) {
        let state = *self;
        spawn_local(async move {
            if let Err(e) = state.controller().enrich_policy(&policy).await {
                state.show_error(format!("Enrichment failed: {}", e));
            }
        });
    }

    // ============ Auth ============

    /// Log in or register according to the current auth mode
    pub fn submit_auth(&self) {
        let state = *self;
        spawn_local(async move {
            if let Err(e) = state.controller().submit_auth().await {
                state.show_error(e.to_string());
            }
        });
    }

    pub fn logout(&self) {
        self.controller().logout();
    }

    // ============ Comments ============

    pub fn fetch_comments(&self, file_id: i64) {
        let state = *self;
        spawn_local(async move {
            if let Err(e) = state.controller().fetch_comments(file_id).await {
                state.show_error(format!("Could not load comments: {}", e));
            }
        });
    }

    pub fn add_comment(&self, file_id: i64) {
        let state = *self;
        spawn_local(async move {
            if let Err(e) = state.controller().add_comment(file_id).await {
                state.show_error(e.to_string());
            }
        });
    }
}

fn log_refresh_failures(report: &RefreshReport) {
    for (resource, error) in report.failures() {
        web_sys::console::error_1(&format!("Failed to fetch {}: {}", resource, error).into());
    }
}
