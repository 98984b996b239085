//! Auth Panel
//!
//! Login/register form, or the current user once logged in.

use leptos::*;

use policy_dashboard::Action;

use crate::state::use_dashboard;

#[component]
pub fn AuthPanel() -> impl IntoView {
    let state = use_dashboard();
    let logged_in = create_memo(move |_| state.view.with(|s| s.is_authenticated()));

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            {move || {
                if logged_in.get() {
                    view! { <UserBadge /> }.into_view()
                } else {
                    view! { <AuthForm /> }.into_view()
                }
            }}
        </section>
    }
}

#[component]
fn UserBadge() -> impl IntoView {
    let state = use_dashboard();
    let user = move || {
        state.view.with(|s| {
            s.user()
                .map(|u| match &u.role {
                    Some(role) => format!("{} ({})", u.username, role),
                    None => u.username.clone(),
                })
                .unwrap_or_else(|| "Loading profile...".to_string())
        })
    };

    view! {
        <div class="flex items-center justify-between">
            <span>"Logged in as " <strong>{user}</strong></span>
            <button
                on:click=move |_| state.logout()
                class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm"
            >
                "Logout"
            </button>
        </div>
    }
}

#[component]
fn AuthForm() -> impl IntoView {
    let state = use_dashboard();
    let mode = move || state.view.with(|s| s.auth_mode);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        state.submit_auth();
    };

    view! {
        <form on:submit=on_submit class="space-y-3">
            <h2 class="text-xl font-semibold">{move || mode().label()}</h2>
            <input
                type="text"
                placeholder="Username"
                prop:value=move || state.view.with(|s| s.username.clone())
                on:input=move |ev| state.dispatch(Action::UsernameChanged(event_target_value(&ev)))
                class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600
                       focus:border-primary-500 focus:outline-none"
            />
            <input
                type="password"
                placeholder="Password"
                prop:value=move || state.view.with(|s| s.password.clone())
                on:input=move |ev| state.dispatch(Action::PasswordChanged(event_target_value(&ev)))
                class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600
                       focus:border-primary-500 focus:outline-none"
            />
            <div class="flex items-center space-x-3">
                <button
                    type="submit"
                    class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium"
                >
                    {move || mode().label()}
                </button>
                <button
                    type="button"
                    on:click=move |_| state.dispatch(Action::AuthModeToggled)
                    class="text-sm text-gray-400 hover:text-white"
                >
                    {move || format!("Switch to {}", mode().toggled().label())}
                </button>
            </div>
        </form>
    }
}
