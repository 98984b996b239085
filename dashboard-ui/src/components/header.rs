//! Header
//!
//! Title, backend health and the API URL setting.

use leptos::*;

use policy_dashboard::RefreshTrigger;

use crate::api;
use crate::state::use_dashboard;

#[component]
pub fn Header() -> impl IntoView {
    let state = use_dashboard();
    let (api_url, set_api_url) = create_signal(api::get_api_base());

    let health = move || {
        state.view.with(|s| {
            if s.health.is_empty() {
                "unknown".to_string()
            } else {
                s.health.clone()
            }
        })
    };
    let healthy = move || state.view.with(|s| s.health == "ok");

    let save_url = move |_| {
        api::set_api_base(&api_url.get_untracked());
        state.check_health();
        state.refresh(RefreshTrigger::Mount);
    };

    view! {
        <header class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4 py-4 flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Policy Dashboard"</h1>
                <div class="flex items-center space-x-4 text-sm">
                    <span class=move || {
                        if healthy() { "text-green-400" } else { "text-red-400" }
                    }>
                        "API: " {health}
                    </span>
                    <input
                        type="text"
                        prop:value=move || api_url.get()
                        on:input=move |ev| set_api_url.set(event_target_value(&ev))
                        class="bg-gray-700 rounded-lg px-3 py-1 border border-gray-600
                               focus:border-primary-500 focus:outline-none"
                    />
                    <button
                        on:click=save_url
                        class="px-3 py-1 bg-primary-600 hover:bg-primary-700 rounded-lg"
                    >
                        "Connect"
                    </button>
                </div>
            </div>
        </header>
    }
}
