//! Upload Panel
//!
//! File picker, upload button and the raw result of the last upload.

use leptos::*;
use wasm_bindgen::JsCast;

use crate::state::use_dashboard;

#[component]
pub fn UploadPanel() -> impl IntoView {
    let state = use_dashboard();

    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            state.select_file(file);
        }
    };

    let selected = move || {
        state.view.with(|s| {
            s.pending_upload
                .as_ref()
                .map(|f| format!("{} ({} bytes)", f.file_name, f.size))
        })
    };
    let result = move || state.view.with(|s| s.upload_result.clone());

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Upload Document"</h2>
            <div class="flex items-center space-x-3">
                <input
                    type="file"
                    accept=".pdf,.docx,.xlsx,.xls,.csv,.png,.jpg,.jpeg"
                    on:change=on_change
                    class="text-sm"
                />
                <button
                    on:click=move |_| state.upload()
                    disabled=move || selected().is_none()
                    class="px-4 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                           rounded-lg font-medium transition-colors"
                >
                    "Upload"
                </button>
            </div>
            {move || selected().map(|s| view! { <p class="text-sm text-gray-400">{s}</p> })}
            {move || {
                let body = result();
                (!body.is_empty()).then(|| view! {
                    <pre class="text-xs bg-gray-900 rounded p-3 overflow-x-auto">{body}</pre>
                })
            }}
        </section>
    }
}
