//! 公開ページのフォーム（問い合わせ・申込・入会）

use leptos::*;

use crate::models::SourceType;
use crate::submissions::{
    submit_contact, submit_membership, submit_registration, ContactForm, MembershipForm,
    RegistrationContext, RegistrationForm,
};
use crate::use_site;

/// 送信結果の表示
fn status_line(status: ReadSignal<Option<Result<String, String>>>) -> impl IntoView {
    move || {
        status.get().map(|s| match s {
            Ok(msg) => view! { <p class="status success">{msg}</p> },
            Err(msg) => view! { <p class="status error">{msg}</p> },
        })
    }
}

/// テキスト入力1つ分
#[component]
fn TextInput(
    value: RwSignal<String>,
    placeholder: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <input type=input_type class="input-field" placeholder=placeholder required=required
            prop:value=move || value.get()
            on:input=move |ev| value.set(event_target_value(&ev)) />
    }
}

// ============================================
// 問い合わせ
// ============================================

#[component]
pub fn ContactSection() -> impl IntoView {
    let site = store_value(use_site());
    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let message = create_rw_signal(String::new());
    let (status, set_status) = create_signal(None::<Result<String, String>>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = ContactForm { name: name.get(), email: email.get(), message: message.get() };
        match site.with_value(|ctx| submit_contact(&ctx.store, &form)) {
            Ok(_) => {
                name.set(String::new());
                email.set(String::new());
                message.set(String::new());
                set_status.set(Some(Ok("Message sent successfully!".to_string())));
            }
            Err(e) => set_status.set(Some(Err(e.to_string()))),
        }
    };

    view! {
        <section id="contact" class="section">
            <h2 class="section-title">"Get in Touch"</h2>
            <form class="contact-form" on:submit=on_submit>
                <div class="form-grid">
                    <TextInput value=name placeholder="Your name" required=true />
                    <TextInput value=email placeholder="Email" input_type="email" required=true />
                </div>
                <textarea class="input-field" rows="5" placeholder="Your message" required
                    prop:value=move || message.get()
                    on:input=move |ev| message.set(event_target_value(&ev))></textarea>
                {status_line(status)}
                <button type="submit" class="btn-primary">"Send Message"</button>
            </form>
        </section>
    }
}

// ============================================
// 大会・イベント申込
// ============================================

#[component]
pub fn RegistrationModal(context: RegistrationContext, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let site = store_value(use_site());
    let competitions = store_value(site.with_value(|ctx| ctx.store.get_competitions()));
    let is_competition = context.source_type == SourceType::Competition;

    // 申込元の大会があればそれを、なければ先頭の大会を選んでおく
    let initial = competitions.with_value(|cs| {
        cs.iter()
            .find(|c| is_competition && c.id == context.source_id)
            .or_else(|| cs.first())
            .map(|c| c.id.clone())
            .unwrap_or_default()
    });
    let selected = create_rw_signal(initial);
    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let phone = create_rw_signal(String::new());
    let category = create_rw_signal(String::new());
    let notes = create_rw_signal(String::new());
    let (status, set_status) = create_signal(None::<Result<String, String>>);
    let context = store_value(context);

    let no_competitions = move || is_competition && competitions.with_value(Vec::is_empty);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = RegistrationForm {
            name: name.get(),
            email: email.get(),
            phone: phone.get(),
            competition_id: if is_competition { selected.get() } else { String::new() },
            category: category.get(),
            notes: notes.get(),
        };
        let outcome = context.with_value(|context| {
            site.with_value(|ctx| submit_registration(&ctx.store, context, &form))
        });
        match outcome {
            Ok(_) => set_status.set(Some(Ok("Registration received! We will reach out soon.".to_string()))),
            Err(e) => set_status.set(Some(Err(e.to_string()))),
        }
    };

    view! {
        <div class="modal-overlay">
            <div class="modal registration-modal">
                <button class="modal-close" on:click=move |_| on_close.call(())>"✕"</button>
                <h2>{if is_competition { "Competition Registration" } else { "Event Registration" }}</h2>
                <p class="modal-subtitle">{context.with_value(|c| c.source_title.clone())}</p>

                {move || match status.get() {
                    Some(Ok(msg)) => view! {
                        <div class="form-done">
                            <p class="status success">{msg}</p>
                            <button class="btn-primary" on:click=move |_| on_close.call(())>"Close"</button>
                        </div>
                    }.into_view(),
                    _ => view! {
                        <form on:submit=on_submit>
                            <div class="form-grid">
                                <TextInput value=name placeholder="Full name" required=true />
                                <TextInput value=email placeholder="Email" input_type="email" required=true />
                            </div>
                            <div class="form-grid">
                                <TextInput value=phone placeholder="Phone / WhatsApp" />
                                {if is_competition {
                                    view! {
                                        <select class="input-field"
                                            disabled=no_competitions
                                            on:change=move |ev| {
                                                selected.set(event_target_value(&ev));
                                                category.set(String::new());
                                            }>
                                            {competitions.with_value(|cs| {
                                                if cs.is_empty() {
                                                    return view! { <option value="">"No competitions available"</option> }.into_view();
                                                }
                                                cs.iter().map(|c| {
                                                    let id = c.id.clone();
                                                    view! {
                                                        <option value=c.id.clone() selected=move || selected.get() == id>
                                                            {c.title.clone()}
                                                        </option>
                                                    }
                                                }).collect_view()
                                            })}
                                        </select>
                                    }.into_view()
                                } else {
                                    view! {
                                        <input class="input-field" disabled
                                            value=context.with_value(|c| c.source_title.clone()) />
                                    }.into_view()
                                }}
                            </div>
                            <div class="form-grid">
                                <select class="input-field" on:change=move |ev| category.set(event_target_value(&ev))>
                                    <option value="">"Pick a category"</option>
                                    {move || {
                                        let options = context.with_value(|c| {
                                            competitions.with_value(|cs| c.category_options(cs, &selected.get()))
                                        });
                                        options.into_iter().map(|cat| {
                                            let value = cat.clone();
                                            view! {
                                                <option value=cat.clone() selected=move || category.get() == value>{cat}</option>
                                            }
                                        }).collect_view()
                                    }}
                                </select>
                                <TextInput value=notes placeholder="Any notes or needs?" />
                            </div>
                            {status_line(status)}
                            <button type="submit" class="btn-primary" disabled=no_competitions>
                                "Submit Registration"
                            </button>
                        </form>
                    }.into_view(),
                }}
            </div>
        </div>
    }
}

// ============================================
// 入会申請
// ============================================

#[component]
pub fn MembershipModal(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let site = store_value(use_site());
    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let phone = create_rw_signal(String::new());
    let grade = create_rw_signal(String::new());
    let interest = create_rw_signal(String::new());
    let notes = create_rw_signal(String::new());
    let (status, set_status) = create_signal(None::<Result<String, String>>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = MembershipForm {
            name: name.get(),
            email: email.get(),
            phone: phone.get(),
            grade: grade.get(),
            interest: interest.get(),
            notes: notes.get(),
        };
        match site.with_value(|ctx| submit_membership(&ctx.store, &form)) {
            Ok(_) => set_status.set(Some(Ok("Membership request submitted successfully.".to_string()))),
            Err(e) => set_status.set(Some(Err(e.to_string()))),
        }
    };

    view! {
        <div class="modal-overlay">
            <div class="modal membership-modal">
                <button class="modal-close" on:click=move |_| on_close.call(())>"✕"</button>
                <h2>"Join the Society"</h2>
                <p class="modal-subtitle">"Fill in your details. Admin will review and update your status."</p>

                {move || match status.get() {
                    Some(Ok(msg)) => view! {
                        <div class="form-done">
                            <p class="status success">{msg}</p>
                            <button class="btn-primary" on:click=move |_| on_close.call(())>"Close"</button>
                        </div>
                    }.into_view(),
                    _ => view! {
                        <form on:submit=on_submit>
                            <div class="form-grid">
                                <TextInput value=name placeholder="Full name" required=true />
                                <TextInput value=email placeholder="Email address" input_type="email" required=true />
                            </div>
                            <div class="form-grid">
                                <TextInput value=phone placeholder="Phone / WhatsApp" />
                                <TextInput value=grade placeholder="Grade / Class" />
                            </div>
                            <div class="form-grid">
                                <TextInput value=interest placeholder="Main interest (e.g. Astrophotography)" />
                                <TextInput value=notes placeholder="Additional notes" />
                            </div>
                            {status_line(status)}
                            <button type="submit" class="btn-primary">"Submit Membership Request"</button>
                        </form>
                    }.into_view(),
                }}
            </div>
        </div>
    }
}
