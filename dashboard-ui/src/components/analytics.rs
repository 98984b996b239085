//! Analytics Panel
//!
//! Totals, anomalous file IDs, cluster membership and both charts.

use leptos::*;

use crate::components::chart::{ClusterBars, FileTypePie};
use crate::state::use_dashboard;

#[component]
pub fn AnalyticsPanel() -> impl IntoView {
    let state = use_dashboard();

    let totals = move || {
        state.view.with(|s| {
            s.summary.as_ref().map(|summary| {
                (
                    summary.total_files,
                    summary.total_policies,
                    summary
                        .file_types
                        .iter()
                        .map(|(k, v)| format!("{}: {}", k, v))
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            })
        })
    };
    let anomalies = move || {
        state.view.with(|s| {
            s.anomalies
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        })
    };
    let clusters = move || state.view.with(|s| s.policy_clusters.clone());

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-6">
            <h2 class="text-xl font-semibold">"Analytics"</h2>

            {move || totals().map(|(files, policies, types)| view! {
                <div class="grid grid-cols-3 gap-4 text-sm">
                    <div>"Total Files: " <strong>{files}</strong></div>
                    <div>"Total Policies: " <strong>{policies}</strong></div>
                    <div>"File Types: " {types}</div>
                </div>
            })}

            <div class="text-sm">"Anomalous File IDs: " {anomalies}</div>

            <div class="text-sm">
                <h3 class="font-semibold mb-2">"Policy Clusters"</h3>
                <ol class="list-decimal ml-6 space-y-1">
                    {move || {
                        clusters()
                            .into_iter()
                            .map(|cluster| view! {
                                <li>
                                    <ul class="list-disc ml-4">
                                        {cluster
                                            .into_iter()
                                            .map(|p| view! { <li>{p}</li> })
                                            .collect::<Vec<_>>()}
                                    </ul>
                                </li>
                            })
                            .collect::<Vec<_>>()
                    }}
                </ol>
            </div>

            <div class="grid md:grid-cols-2 gap-8">
                <div>
                    <h3 class="font-semibold mb-2">"File Type Distribution"</h3>
                    <FileTypePie />
                </div>
                <div>
                    <h3 class="font-semibold mb-2">"Policy Cluster Sizes"</h3>
                    <ClusterBars />
                </div>
            </div>
        </section>
    }
}
