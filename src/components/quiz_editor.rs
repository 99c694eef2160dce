//! クイズの問題エディタ（追加・編集モーダルの中に出す）

use leptos::*;

use crate::admin::{QuestionDraft, QuizDraft, SiteDashboard};
use crate::models::QUIZ_OPTION_COUNT;

fn edit_draft(dashboard: RwSignal<SiteDashboard>, f: impl FnOnce(&mut QuizDraft)) {
    dashboard.update(|d| {
        if let Some(draft) = d.quiz_draft_mut() {
            f(draft);
        }
    });
}

#[component]
pub fn QuizEditor(dashboard: RwSignal<SiteDashboard>) -> impl IntoView {
    // 行の追加・削除のときだけ作り直す
    let row_ids = create_memo(move |_| {
        dashboard.with(|d| {
            d.quiz_draft()
                .map(|q| q.questions().iter().map(|r| r.id.clone()).collect::<Vec<_>>())
                .unwrap_or_default()
        })
    });

    view! {
        <div class="quiz-editor">
            <div class="quiz-editor-header">
                <h3>"Questions"</h3>
                <button type="button" class="btn-secondary"
                    on:click=move |_| edit_draft(dashboard, |q| q.add_question())>
                    "+ Add Question"
                </button>
            </div>
            <p class="hint">"Rows with an empty question or option are skipped when saving."</p>

            {move || (0..row_ids.get().len()).map(|index| view! {
                <QuestionRow index=index dashboard=dashboard row_count=Signal::derive(move || row_ids.with(Vec::len)) />
            }).collect_view()}
        </div>
    }
}

#[component]
fn QuestionRow(index: usize, dashboard: RwSignal<SiteDashboard>, row_count: Signal<usize>) -> impl IntoView {
    let row = move || -> QuestionDraft {
        dashboard.with(|d| {
            d.quiz_draft()
                .and_then(|q| q.questions().get(index).cloned())
                .unwrap_or_else(|| QuestionDraft {
                    id: String::new(),
                    question: String::new(),
                    options: Vec::new(),
                    correct_index: 0,
                })
        })
    };

    view! {
        <div class="question-row">
            <div class="question-row-header">
                <span class="question-number">{format!("Q{}", index + 1)}</span>
                <button type="button" class="btn-danger-small"
                    disabled=move || row_count.get() <= 1
                    on:click=move |_| edit_draft(dashboard, move |q| { q.remove_question(index); })>
                    "Remove"
                </button>
            </div>

            <input type="text" class="input-field" placeholder="Question"
                prop:value=move || row().question
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    edit_draft(dashboard, move |q| q.set_question_text(index, &text));
                } />

            <div class="option-list">
                {(0..QUIZ_OPTION_COUNT).map(|option| view! {
                    <div class="option-row">
                        <input type="radio" name=format!("correct-{}", index) title="Correct answer"
                            prop:checked=move || row().correct_index == option
                            on:change=move |_| edit_draft(dashboard, move |q| {
                                // 0..QUIZ_OPTION_COUNT の範囲なので失敗しない
                                let _ = q.mark_correct(index, option);
                            }) />
                        <input type="text" class="input-field" placeholder=format!("Option {}", option + 1)
                            prop:value=move || row().options.get(option).cloned().unwrap_or_default()
                            on:input=move |ev| {
                                let text = event_target_value(&ev);
                                edit_draft(dashboard, move |q| q.set_option_text(index, option, &text));
                            } />
                    </div>
                }).collect_view()}
            </div>
        </div>
    }
}
