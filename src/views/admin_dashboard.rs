//! 管理ダッシュボード画面
//!
//! 状態とロジックは `admin::Dashboard` にあり、ここは表示とボタンの配線だけ。

use leptos::*;

use crate::admin::{NoticeKind, SiteDashboard};
use crate::components::{NoticeToast, RecordFormModal};
use crate::config::format_seed_modified_time;
use crate::models::{AnyRecord, Collection, Competition, Quiz, ReviewStatus};
use crate::use_site;
use crate::utils::log_trace::{clear_logs, get_logs_json};
use crate::utils::{confirm, download_json, timestamped_filename};

// ============================================
// ボタン操作
// ============================================

fn open_edit(dashboard: RwSignal<SiteDashboard>, record: AnyRecord) {
    dashboard.update(|d| {
        if let Err(e) = d.open_edit_modal(record) {
            d.notify(NoticeKind::Error, e.to_string());
        }
    });
}

fn open_add(dashboard: RwSignal<SiteDashboard>) {
    dashboard.update(|d| {
        if let Err(e) = d.open_add_modal() {
            d.notify(NoticeKind::Error, e.to_string());
        }
    });
}

// 失敗は Dashboard 側で通知済み
fn delete_record(dashboard: RwSignal<SiteDashboard>, collection: Collection, id: &str) {
    dashboard.update(|d| {
        let _ = d.handle_delete(collection, id, || confirm("Are you sure you want to delete this item?"));
    });
}

fn review(dashboard: RwSignal<SiteDashboard>, collection: Collection, id: &str, status: ReviewStatus) {
    dashboard.update(|d| {
        let _ = d.set_status(collection, id, status);
    });
}

fn export_data(dashboard: RwSignal<SiteDashboard>) {
    match dashboard.with_untracked(|d| d.export_json()) {
        Ok(json) => download_json(&timestamped_filename("site_data"), &json),
        Err(e) => dashboard.update(|d| {
            d.notify(NoticeKind::Error, e.to_string());
        }),
    }
}

// ============================================
// 行の部品
// ============================================

fn status_badge(status: ReviewStatus) -> impl IntoView {
    view! { <span class=format!("status-badge {}", status.as_str())>{status.as_str()}</span> }
}

fn row_actions(dashboard: RwSignal<SiteDashboard>, record: &AnyRecord) -> impl IntoView {
    let collection = record.collection();
    let id = record.id().to_string();
    let approve_id = id.clone();
    let reject_id = id.clone();
    let edit_record = record.clone();

    view! {
        <div class="row-actions">
            {collection.is_reviewable().then(|| view! {
                <button class="btn-approve"
                    on:click=move |_| review(dashboard, collection, &approve_id, ReviewStatus::Approved)>
                    "Approve"
                </button>
                <button class="btn-reject"
                    on:click=move |_| review(dashboard, collection, &reject_id, ReviewStatus::Rejected)>
                    "Reject"
                </button>
            })}
            {collection.is_form_editable().then(|| view! {
                <button class="btn-icon" title="Edit"
                    on:click=move |_| open_edit(dashboard, edit_record.clone())>
                    "✎"
                </button>
            })}
            <button class="btn-icon danger" title="Delete"
                on:click=move |_| delete_record(dashboard, collection, &id)>
                "🗑"
            </button>
        </div>
    }
}

fn empty_state(text: &'static str) -> View {
    view! { <div class="empty-state"><p>{text}</p></div> }.into_view()
}

// ============================================
// タブごとの一覧
// ============================================

fn gallery_grid(dashboard: RwSignal<SiteDashboard>, records: Vec<AnyRecord>) -> View {
    view! {
        <div class="admin-gallery-grid">
            {records.iter().filter_map(|record| match record {
                AnyRecord::Gallery(img) => Some(view! {
                    <div class="admin-gallery-item">
                        <img src=img.src.clone() alt=img.alt.clone() />
                        <div class="admin-gallery-caption">
                            <p class="caption-title">{img.alt.clone()}</p>
                            <p class="caption-category">{img.category.clone()}</p>
                            {row_actions(dashboard, record)}
                        </div>
                    </div>
                }),
                _ => None,
            }).collect_view()}
        </div>
    }
    .into_view()
}

fn message_list(dashboard: RwSignal<SiteDashboard>, records: Vec<AnyRecord>) -> View {
    if records.is_empty() {
        return empty_state("No messages yet");
    }
    view! {
        <div class="message-list">
            {records.iter().filter_map(|record| match record {
                AnyRecord::Message(msg) => Some(view! {
                    <div class="message-card">
                        <div class="message-header">
                            <div>
                                <h4>{msg.name.clone()}</h4>
                                <p class="message-email">{msg.email.clone()}</p>
                            </div>
                            <span class="message-date">{msg.date.clone()}</span>
                        </div>
                        <p class="message-body">{msg.message.clone()}</p>
                        {row_actions(dashboard, record)}
                    </div>
                }),
                _ => None,
            }).collect_view()}
        </div>
    }
    .into_view()
}

fn registration_table(dashboard: RwSignal<SiteDashboard>, records: Vec<AnyRecord>, competitions: &[Competition]) -> View {
    view! {
        <table class="admin-table">
            <thead>
                <tr>
                    <th>"Student"</th><th>"Type"</th><th>"Source"</th><th>"Contact"</th>
                    <th>"Category"</th><th>"Status"</th><th>"Date"</th><th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                {records.iter().filter_map(|record| match record {
                    AnyRecord::Registration(reg) => Some(view! {
                        <tr>
                            <td>
                                <div class="cell-title">{reg.name.clone()}</div>
                                <div class="cell-sub">{reg.notes.clone().unwrap_or_else(|| "—".to_string())}</div>
                            </td>
                            <td><span class="pill">{reg.request_type().as_str()}</span></td>
                            <td>{reg.display_title(competitions)}</td>
                            <td>
                                <div>{reg.email.clone()}</div>
                                <div class="cell-sub">{reg.phone.clone().unwrap_or_else(|| "—".to_string())}</div>
                            </td>
                            <td><span class="pill">{reg.category.clone().unwrap_or_else(|| "General".to_string())}</span></td>
                            <td>{status_badge(reg.status)}</td>
                            <td>{reg.date.clone()}</td>
                            <td>{row_actions(dashboard, record)}</td>
                        </tr>
                    }),
                    _ => None,
                }).collect_view()}
            </tbody>
        </table>
    }
    .into_view()
}

fn membership_table(dashboard: RwSignal<SiteDashboard>, records: Vec<AnyRecord>) -> View {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    view! {
        <table class="admin-table">
            <thead>
                <tr>
                    <th>"Member"</th><th>"Contact"</th><th>"Profile"</th><th>"Status"</th><th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                {records.iter().filter_map(|record| match record {
                    AnyRecord::Membership(member) => Some(view! {
                        <tr>
                            <td>
                                <div class="cell-title">{member.name.clone()}</div>
                                <div class="cell-sub">{member.date.clone()}</div>
                            </td>
                            <td>
                                <div>{member.email.clone()}</div>
                                <div class="cell-sub">{member.phone.clone().unwrap_or_else(|| "No phone".to_string())}</div>
                            </td>
                            <td>
                                <div>"Grade: " {or_dash(&member.grade)}</div>
                                <div class="cell-sub">"Interest: " {or_dash(&member.interest)}</div>
                            </td>
                            <td>{status_badge(member.status)}</td>
                            <td>{row_actions(dashboard, record)}</td>
                        </tr>
                    }),
                    _ => None,
                }).collect_view()}
            </tbody>
        </table>
    }
    .into_view()
}

fn quiz_table(dashboard: RwSignal<SiteDashboard>, records: Vec<AnyRecord>) -> View {
    view! {
        <table class="admin-table">
            <thead>
                <tr><th>"Quiz"</th><th>"Questions"</th><th>"Created"</th><th>"Actions"</th></tr>
            </thead>
            <tbody>
                {records.iter().filter_map(|record| match record {
                    AnyRecord::Quiz(quiz) => Some(view! {
                        <tr>
                            <td>
                                <div class="cell-title">{quiz.title.clone()}</div>
                                <div class="cell-sub">{quiz.description.clone()}</div>
                            </td>
                            <td>{quiz.questions.len()}</td>
                            <td>{if quiz.created_at.is_empty() { "-".to_string() } else { quiz.created_at.clone() }}</td>
                            <td>{row_actions(dashboard, record)}</td>
                        </tr>
                    }),
                    _ => None,
                }).collect_view()}
            </tbody>
        </table>
    }
    .into_view()
}

fn attempt_table(dashboard: RwSignal<SiteDashboard>, records: Vec<AnyRecord>, quizzes: &[Quiz]) -> View {
    view! {
        <table class="admin-table">
            <thead>
                <tr><th>"Participant"</th><th>"Quiz"</th><th>"Score"</th><th>"Date"</th><th>"Actions"</th></tr>
            </thead>
            <tbody>
                {records.iter().filter_map(|record| match record {
                    AnyRecord::QuizAttempt(attempt) => {
                        let quiz_title = quizzes
                            .iter()
                            .find(|q| q.id == attempt.quiz_id)
                            .map(|q| q.title.clone())
                            .unwrap_or_else(|| "N/A".to_string());
                        Some(view! {
                            <tr>
                                <td>
                                    <div class="cell-title">{attempt.name.clone()}</div>
                                    <div class="cell-sub">{attempt.email.clone()}</div>
                                </td>
                                <td>{quiz_title}</td>
                                <td><span class="pill">{format!("{}/{}", attempt.score, attempt.total)}</span></td>
                                <td>{attempt.date.clone()}</td>
                                <td>{row_actions(dashboard, record)}</td>
                            </tr>
                        })
                    }
                    _ => None,
                }).collect_view()}
            </tbody>
        </table>
    }
    .into_view()
}

/// イベント・ニュース・大会・チーム・実績の共通テーブル
fn generic_table(dashboard: RwSignal<SiteDashboard>, records: Vec<AnyRecord>) -> View {
    view! {
        <table class="admin-table">
            <thead>
                <tr><th>"Details"</th><th>"Category"</th><th>"Date"</th><th>"Actions"</th></tr>
            </thead>
            <tbody>
                {records.iter().map(|record| {
                    let summary = record.summary();
                    view! {
                        <tr>
                            <td>
                                <div class="cell-title">
                                    {summary.featured.then(|| view! { <span class="featured-star" title="Featured">"★"</span> })}
                                    {summary.title}
                                </div>
                                <div class="cell-sub">{summary.subtitle}</div>
                            </td>
                            <td><span class="pill">{summary.category}</span></td>
                            <td>{summary.date}</td>
                            <td>{row_actions(dashboard, record)}</td>
                        </tr>
                    }
                }).collect_view()}
            </tbody>
        </table>
    }
    .into_view()
}

// ============================================
// 画面本体
// ============================================

#[component]
pub fn AdminDashboard<F>(on_logout: F) -> impl IntoView
where
    F: Fn() + Clone + 'static,
{
    let ctx = use_site();
    let notice_ms = ctx.config.notice_ms;
    let storage_key = ctx.store.storage_key().to_string();
    let site_title = ctx.config.site_title.clone();
    let revision = ctx.revision;
    let dashboard = create_rw_signal(SiteDashboard::new(ctx.store.clone()));

    // フォーム入力では一覧を描き直さない
    let listing = create_memo(move |_| dashboard.with(|d| (d.active(), d.visible_records())));
    let lookups = create_memo(move |_| {
        dashboard.with(|d| (d.snapshot().competitions.clone(), d.snapshot().quizzes.clone()))
    });
    let counts = create_memo(move |_| {
        dashboard.with(|d| Collection::ALL.map(|c| d.count(c)))
    });
    let notice = create_memo(move |_| dashboard.with(|d| d.notice().cloned()));

    let clear_log = move |_| {
        if confirm("Clear the operation log?") {
            clear_logs();
            dashboard.update(|d| {
                d.notify(NoticeKind::Success, "Operation log cleared.");
            });
        }
    };

    let reset = move |_| {
        dashboard.update(|d| {
            d.reset_store(|| confirm("Reset all site data to defaults? This cannot be undone."));
        });
    };

    view! {
        <div class="admin-dashboard">
            <header class="admin-header">
                <div>
                    <h1>"Admin Dashboard"</h1>
                    <p class="admin-subtitle">{site_title}</p>
                </div>
                <div class="admin-actions">
                    <button class="btn-secondary" on:click=move |_| export_data(dashboard)>"Export data"</button>
                    <button class="btn-secondary"
                        on:click=move |_| download_json(&timestamped_filename("operation_log"), &get_logs_json())>
                        "Download log"
                    </button>
                    <button class="btn-secondary" on:click=clear_log>"Clear log"</button>
                    <button class="btn-danger" on:click=reset>"Reset to defaults"</button>
                    <button class="btn-primary" on:click=move |_| on_logout()>"Logout"</button>
                </div>
            </header>

            <nav class="admin-tabs">
                {Collection::ALL.iter().enumerate().map(|(i, &collection)| view! {
                    <button
                        class=move || if listing.with(|(active, _)| *active == collection) { "tab active" } else { "tab" }
                        on:click=move |_| dashboard.update(|d| d.set_active(collection))
                    >
                        {collection.label()}
                        <span class="tab-count">{move || counts.with(|c| c[i])}</span>
                    </button>
                }).collect_view()}
            </nav>

            <div class="admin-toolbar">
                <input type="search" class="input-field" placeholder="Search..."
                    prop:value=move || dashboard.with(|d| d.search().to_string())
                    on:input=move |ev| dashboard.update(|d| d.set_search(&event_target_value(&ev))) />
                {move || listing.with(|(active, _)| active.is_form_editable()).then(|| view! {
                    <button class="btn-primary" on:click=move |_| open_add(dashboard)>"+ Add New"</button>
                })}
            </div>

            <div class="admin-content">
                {move || {
                    let (active, records) = listing.get();
                    if records.is_empty() && active != Collection::Messages {
                        return empty_state("No records found.");
                    }
                    lookups.with(|(competitions, quizzes)| match active {
                        Collection::Gallery => gallery_grid(dashboard, records),
                        Collection::Messages => message_list(dashboard, records),
                        Collection::Registrations => registration_table(dashboard, records, competitions),
                        Collection::Memberships => membership_table(dashboard, records),
                        Collection::Quizzes => quiz_table(dashboard, records),
                        Collection::QuizAttempts => attempt_table(dashboard, records, quizzes),
                        Collection::Events
                        | Collection::News
                        | Collection::Competitions
                        | Collection::Team
                        | Collection::Achievements => generic_table(dashboard, records),
                    })
                }}
            </div>

            <footer class="admin-footer">
                <span>{format_seed_modified_time()}</span>
                <span>"Storage key: " {storage_key}</span>
            </footer>

            <RecordFormModal dashboard=dashboard on_saved=move || revision.update(|r| *r += 1) />
            <NoticeToast
                notice=notice
                duration_ms=notice_ms
                on_expire=move |id| dashboard.update(|d| d.clear_notice(id))
            />
        </div>
    }
}
