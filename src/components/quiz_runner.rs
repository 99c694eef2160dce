//! 公開ページのクイズ受験モーダル

use leptos::*;

use crate::quiz::{score_message, submit_attempt, AnswerSheet, Participant};
use crate::use_site;

#[component]
pub fn QuizRunner(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let site = store_value(use_site());
    let quizzes = store_value(site.with_value(|ctx| ctx.store.get_quizzes()));

    let (quiz_id, set_quiz_id) = create_signal(
        quizzes.with_value(|qs| qs.first().map(|q| q.id.clone()).unwrap_or_default()),
    );
    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let answers = create_rw_signal(AnswerSheet::new());
    let (error, set_error) = create_signal(None::<String>);
    let (result, set_result) = create_signal(None::<String>);

    let active_quiz = move || quizzes.with_value(|qs| qs.iter().find(|q| q.id == quiz_id.get()).cloned());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let participant = Participant::new(&name.get(), &email.get());
        let outcome = site.with_value(|ctx| {
            let outcome = submit_attempt(&ctx.store, &quiz_id.get(), &participant, &answers.get());
            if outcome.is_ok() {
                ctx.mark_changed();
            }
            outcome
        });
        match outcome {
            Ok(attempt) => {
                set_error.set(None);
                set_result.set(Some(score_message(&attempt)));
                answers.set(AnswerSheet::new());
                set_name.set(String::new());
                set_email.set(String::new());
            }
            Err(e) => set_error.set(Some(e.to_string())),
        }
    };

    let quiz_form = move || view! {
        <form on:submit=on_submit>
            <div class="form-grid">
                <input type="text" class="input-field" placeholder="Your name" required
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev)) />
                <input type="email" class="input-field" placeholder="Email" required
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev)) />
            </div>

            <select class="input-field"
                disabled=move || quizzes.with_value(Vec::is_empty)
                on:change=move |ev| {
                    set_quiz_id.set(event_target_value(&ev));
                    answers.set(AnswerSheet::new());
                }>
                {move || quizzes.with_value(|qs| {
                    if qs.is_empty() {
                        return view! { <option value="">"No quizzes published"</option> }.into_view();
                    }
                    qs.iter().map(|q| {
                        let id = q.id.clone();
                        view! {
                            <option value=q.id.clone() selected=move || quiz_id.get() == id>{q.title.clone()}</option>
                        }
                    }).collect_view()
                })}
            </select>

            {move || active_quiz().map(|quiz| {
                quiz.questions.into_iter().enumerate().map(|(number, question)| {
                    let group = format!("quiz-{}", question.id);
                    let heading = format!("Q{}. {}", number + 1, question.question);
                    let question_id = question.id;
                    let options = question.options;
                    view! {
                        <div class="quiz-question">
                            <p class="quiz-question-text">{heading}</p>
                            <div class="quiz-options">
                                {options.into_iter().enumerate().map(|(index, option)| {
                                    let checked_id = question_id.clone();
                                    let class_id = question_id.clone();
                                    let answer_id = question_id.clone();
                                    view! {
                                        <label class=move || if answers.with(|a| a.get(&class_id) == Some(&index)) {
                                            "quiz-option selected"
                                        } else {
                                            "quiz-option"
                                        }>
                                            <input type="radio" name=group.clone()
                                                prop:checked=move || answers.with(|a| a.get(&checked_id) == Some(&index))
                                                on:change=move |_| answers.update(|a| {
                                                    a.insert(answer_id.clone(), index);
                                                }) />
                                            {option}
                                        </label>
                                    }
                                }).collect_view()}
                            </div>
                        </div>
                    }
                }).collect_view()
            })}

            {move || error.get().map(|e| view! { <p class="status error">{e}</p> })}

            <button type="submit" class="btn-primary" disabled=move || quizzes.with_value(Vec::is_empty)>
                "Submit Answers"
            </button>
        </form>
    };

    view! {
        <div class="modal-overlay">
            <div class="modal quiz-modal">
                <button class="modal-close" on:click=move |_| on_close.call(())>"✕"</button>
                <h2>"Quiz Challenge"</h2>
                <p class="modal-subtitle">"Complete the MCQs and submit to get your score."</p>

                {move || match result.get() {
                    Some(message) => view! {
                        <div class="quiz-result">
                            <p class="status success">{message}</p>
                            <button class="btn-primary" on:click=move |_| on_close.call(())>"Close"</button>
                        </div>
                    }.into_view(),
                    None => quiz_form().into_view(),
                }}
            </div>
        </div>
    }
}
