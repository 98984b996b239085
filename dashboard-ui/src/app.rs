//! App Root Component
//!
//! Single page: header, auth, upload, files and analytics.

use leptos::*;

use policy_dashboard::RefreshTrigger;

use crate::components::{AnalyticsPanel, AuthPanel, FilesTable, Header, Toast, UploadPanel};
use crate::state::{provide_global_state, use_dashboard};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    // Initial load
    let state = use_dashboard();
    state.check_health();
    state.refresh(RefreshTrigger::Mount);

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <Header />

            <main class="flex-1 container mx-auto px-4 py-8 space-y-8">
                <div class="grid md:grid-cols-2 gap-8">
                    <AuthPanel />
                    <UploadPanel />
                </div>

                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Uploaded Files"</h2>
                    <FilesTable />
                </section>

                <AnalyticsPanel />
            </main>

            <Toast />
        </div>
    }
}
