//! Toast Notification Component
//!
//! Renders the notification queue from the view state.

use leptos::*;

use policy_dashboard::{Action, Notification, NotificationLevel};

use crate::state::use_dashboard;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_dashboard();
    let notifications = create_memo(move |_| state.view.with(|s| s.notifications.clone()));

    view! {
        <div class="fixed bottom-4 right-4 z-50 space-y-2">
            <For
                each=move || notifications.get()
                key=|n| n.id
                children=move |n: Notification| view! { <ToastMessage notification=n /> }
            />
        </div>
    }
}

#[component]
fn ToastMessage(notification: Notification) -> impl IntoView {
    let state = use_dashboard();
    let (icon, bg_class) = match notification.level {
        NotificationLevel::Success => ("✓", "bg-green-600"),
        NotificationLevel::Error => ("✕", "bg-red-600"),
    };
    let id = notification.id;

    view! {
        <div class=format!(
            "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
             transform transition-all duration-300 ease-out animate-slide-in",
            bg_class
        )>
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{notification.message}</span>
            <button
                class="ml-2 text-white/70 hover:text-white"
                on:click=move |_| state.dispatch(Action::NotificationDismissed(id))
            >
                "×"
            </button>
        </div>
    }
}
