//! Files Table
//!
//! Uploaded files with their extracted policies, enrichment results and
//! comment threads.

use leptos::*;

use policy_dashboard::render::text::format_timestamp;
use policy_dashboard::{Action, Comment, EnrichmentResult, FileRecord, StorageLinks};

use crate::state::use_dashboard;

#[component]
pub fn FilesTable() -> impl IntoView {
    let state = use_dashboard();
    let files = create_memo(move |_| state.view.with(|s| s.files.clone()));

    view! {
        <div class="overflow-x-auto">
            {move || {
                if files.with(|f| f.is_empty()) {
                    view! { <p class="text-gray-400">"No files uploaded yet."</p> }.into_view()
                } else {
                    view! {
                        <table class="w-full text-sm">
                            <thead>
                                <tr class="text-left text-gray-400 border-b border-gray-700">
                                    <th class="py-2 pr-4">"ID"</th>
                                    <th class="py-2 pr-4">"Filename"</th>
                                    <th class="py-2 pr-4">"Summary"</th>
                                    <th class="py-2">"Policies"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || files.get()
                                    key=row_key
                                    children=move |file: FileRecord| view! { <FileRow file=file /> }
                                />
                            </tbody>
                        </table>
                    }.into_view()
                }
            }}
        </div>
    }
}

/// Rows are rebuilt when any displayed field changes, not only the id
type RowKey = (i64, String, Option<String>, Option<String>, Vec<String>);

fn row_key(file: &FileRecord) -> RowKey {
    (
        file.id,
        file.filename.clone(),
        file.file_url.clone(),
        file.summary.clone(),
        file.policies.clone(),
    )
}

#[component]
fn FileRow(file: FileRecord) -> impl IntoView {
    let state = use_dashboard();
    let file_id = file.id;
    let link = StorageLinks::default().file_link(&file);
    let anomalous = move || state.view.with(|s| s.is_anomalous(file_id));

    view! {
        <tr class="border-b border-gray-800 align-top">
            <td class="py-3 pr-4">
                {file_id}
                {move || anomalous().then(|| view! {
                    <span class="ml-2 px-2 py-0.5 text-xs bg-red-700 rounded">"anomaly"</span>
                })}
            </td>
            <td class="py-3 pr-4">
                {match link {
                    Some(href) => view! {
                        <a href=href target="_blank" class="text-primary-400 hover:underline">
                            {file.filename.clone()}
                        </a>
                    }.into_view(),
                    None => file.filename.clone().into_view(),
                }}
            </td>
            <td class="py-3 pr-4 text-gray-300">{file.summary.clone().unwrap_or_default()}</td>
            <td class="py-3">
                <ul class="space-y-2">
                    {file.policies
                        .iter()
                        .cloned()
                        .map(|policy| view! { <PolicyItem policy=policy /> })
                        .collect::<Vec<_>>()}
                </ul>
                <CommentThread file_id=file_id />
            </td>
        </tr>
    }
}

#[component]
fn PolicyItem(policy: String) -> impl IntoView {
    let state = use_dashboard();

    let key = policy.clone();
    let results = create_memo(move |_| {
        state
            .view
            .with(|s| s.enrichment_for(&key).map(|r| r.to_vec()))
    });

    let to_enrich = policy.clone();
    let on_enrich = move |_| state.enrich_policy(to_enrich.clone());

    view! {
        <li>
            <div class="flex items-center space-x-2">
                <span>{policy}</span>
                <button
                    on:click=on_enrich
                    class="px-2 py-1 text-xs bg-gray-700 hover:bg-gray-600 rounded"
                >
                    "Enrich"
                </button>
            </div>
            {move || results.get().map(|results| view! { <EnrichmentList results=results /> })}
        </li>
    }
}

#[component]
fn EnrichmentList(results: Vec<EnrichmentResult>) -> impl IntoView {
    view! {
        <ul class="ml-4 mt-1 space-y-1 text-xs">
            {results
                .into_iter()
                .map(|r| view! {
                    <li>
                        <a href=r.url target="_blank" class="text-primary-400 hover:underline">
                            {r.name}
                        </a>
                        <span class="text-gray-400">": " {r.snippet}</span>
                    </li>
                })
                .collect::<Vec<_>>()}
        </ul>
    }
}

#[component]
fn CommentThread(file_id: i64) -> impl IntoView {
    let state = use_dashboard();
    let (open, set_open) = create_signal(false);

    let comments = create_memo(move |_| state.view.with(|s| s.comments_for(file_id).to_vec()));
    let draft = move || state.view.with(|s| s.comment_draft(file_id).to_string());
    let policies = move || {
        state.view.with_untracked(|s| {
            s.files
                .iter()
                .find(|f| f.id == file_id)
                .map(|f| f.policies.clone())
                .unwrap_or_default()
        })
    };

    let toggle = move |_| {
        let opening = !open.get_untracked();
        set_open.set(opening);
        if opening {
            state.fetch_comments(file_id);
        }
    };

    view! {
        <div class="mt-3">
            <button on:click=toggle class="text-xs text-gray-400 hover:text-white">
                {move || if open.get() { "Hide comments" } else { "Comments" }}
            </button>
            {move || open.get().then(|| view! {
                <div class="mt-2 space-y-2">
                    {move || {
                        comments.get()
                            .into_iter()
                            .map(|comment| view! { <CommentItem comment=comment /> })
                            .collect::<Vec<_>>()
                    }}
                    <div class="flex flex-col space-y-2">
                        <select
                            class="bg-gray-700 rounded px-2 py-1 text-xs"
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                state.dispatch(Action::CommentPolicyTagged {
                                    file_id,
                                    policy_text: Some(value).filter(|v| !v.is_empty()),
                                });
                            }
                        >
                            <option value="">"No policy"</option>
                            {policies()
                                .into_iter()
                                .map(|p| view! { <option value=p.clone()>{p.clone()}</option> })
                                .collect::<Vec<_>>()}
                        </select>
                        <textarea
                            class="bg-gray-700 rounded px-2 py-1 text-sm"
                            placeholder="Add a comment"
                            prop:value=draft
                            on:input=move |ev| state.dispatch(Action::CommentDraftChanged {
                                file_id,
                                content: event_target_value(&ev),
                            })
                        />
                        <button
                            on:click=move |_| state.add_comment(file_id)
                            class="self-end px-3 py-1 text-xs bg-primary-600 hover:bg-primary-700 rounded"
                        >
                            "Post"
                        </button>
                    </div>
                </div>
            })}
        </div>
    }
}

#[component]
fn CommentItem(comment: Comment) -> impl IntoView {
    let when = comment
        .timestamp
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_default();

    view! {
        <div class="text-xs bg-gray-900 rounded p-2">
            <div class="text-gray-400">{format!("{} ({})", comment.user, when)}</div>
            <div>{comment.content}</div>
            {comment.policy_text.filter(|p| !p.is_empty()).map(|p| view! {
                <div class="text-gray-500">"Policy: " {p}</div>
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key_tracks_refetched_content() {
        let before = FileRecord {
            id: 4,
            filename: "report.pdf".to_string(),
            file_url: Some("s3://bucket/report.pdf".to_string()),
            content_type: None,
            upload_time: None,
            summary: None,
            policies: vec![],
        };
        let after = FileRecord {
            summary: Some("Annual report".to_string()),
            policies: vec!["Data Retention".to_string()],
            ..before.clone()
        };

        assert_ne!(row_key(&before), row_key(&after));
        assert_eq!(row_key(&after), row_key(&after.clone()));
    }
}
