//! 追加・編集モーダル
//!
//! 入力欄は `form_fields` の定義から組み立てる。値はダッシュボード側の
//! `FormValues` に直接書き込むので、このコンポーネントは状態を持たない。

use leptos::*;

use super::QuizEditor;
use crate::admin::{form_fields, FieldKind, FieldSpec, SiteDashboard};
use crate::models::Collection;

#[component]
pub fn RecordFormModal<F>(dashboard: RwSignal<SiteDashboard>, on_saved: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    // 入力のたびに作り直さないよう、開いているフォームの種類だけを追う
    let open_form = create_memo(move |_| {
        dashboard.with(|d| d.editor().map(|e| (e.collection, e.is_new())))
    });

    let close = move |_| dashboard.update(|d| d.close_editor());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(Ok(_)) = dashboard.try_update(|d| d.handle_save()) {
            on_saved();
        }
    };

    view! {
        {move || open_form.get().map(|(collection, is_new)| {
            let title = format!("{} {}", if is_new { "Add" } else { "Edit" }, collection.label());
            view! {
                <div class="modal-overlay">
                    <div class="modal record-form-modal">
                        <button class="modal-close" on:click=close>"✕"</button>
                        <h2>{title}</h2>

                        <form on:submit=on_submit>
                            {form_fields(collection).iter().map(|spec| view! {
                                <FieldInput spec=*spec dashboard=dashboard />
                            }).collect_view()}

                            {(collection == Collection::Quizzes).then(|| view! {
                                <QuizEditor dashboard=dashboard />
                            })}

                            <div class="form-actions">
                                <button type="button" class="btn-secondary" on:click=close>"Cancel"</button>
                                <button type="submit" class="btn-primary">"Save"</button>
                            </div>
                        </form>
                    </div>
                </div>
            }
        })}
    }
}

/// 1項目分の入力欄
#[component]
fn FieldInput(spec: FieldSpec, dashboard: RwSignal<SiteDashboard>) -> impl IntoView {
    let name = spec.name;
    let value = move || dashboard.with(|d| d.field_value(name));
    let set = move |v: String| dashboard.update(|d| d.set_field(name, &v));

    let input = match spec.kind {
        FieldKind::Text => view! {
            <input type="text" class="input-field" required=spec.required
                prop:value=value
                on:input=move |ev| set(event_target_value(&ev)) />
        }
        .into_view(),
        FieldKind::Date => view! {
            <input type="date" class="input-field"
                prop:value=value
                on:input=move |ev| set(event_target_value(&ev)) />
        }
        .into_view(),
        FieldKind::TextArea => view! {
            <textarea class="input-field" rows="4"
                prop:value=value
                on:input=move |ev| set(event_target_value(&ev))></textarea>
        }
        .into_view(),
        FieldKind::Select(options) => view! {
            <select class="input-field" on:change=move |ev| set(event_target_value(&ev))>
                {options.iter().map(|opt| {
                    let opt: &'static str = opt;
                    view! { <option value=opt selected=move || value() == opt>{opt}</option> }
                }).collect_view()}
            </select>
        }
        .into_view(),
        FieldKind::Toggle => view! {
            <input type="checkbox"
                prop:checked=move || value() == "true"
                on:change=move |ev| set(event_target_checked(&ev).to_string()) />
        }
        .into_view(),
    };

    view! {
        <label class=format!("form-field field-{}", name)>
            <span class="field-label">{spec.label}{spec.required.then_some(" *")}</span>
            {input}
        </label>
    }
}
