//! 公開ページ
//!
//! 表示はすべて `SiteContext::data()` から読む。フォーム送信や管理画面での
//! 変更で revision が進むと読み直される。

use leptos::*;

use crate::components::{ContactSection, MembershipModal, QuizRunner, RegistrationModal};
use crate::models::{Event, SiteData};
use crate::submissions::RegistrationContext;
use crate::use_site;

/// 開いているモーダル
#[derive(Debug, Clone, PartialEq)]
enum PublicModal {
    Closed,
    Quiz,
    Membership,
    Registration(RegistrationContext),
}

fn event_card(event: Event, open: WriteSignal<PublicModal>) -> impl IntoView {
    let context = RegistrationContext::for_event(&event);
    view! {
        <div class="event-card">
            {event.image.clone().map(|src| view! { <img class="card-image" src=src alt=event.title.clone() /> })}
            <span class="pill">{event.category.as_str()}</span>
            <h3>{event.title.clone()}</h3>
            <p class="card-meta">{format!("{} · {} · {}", event.date, event.time, event.location)}</p>
            <p class="card-body">{event.description.clone()}</p>
            <button class="link-button"
                on:click=move |_| open.set(PublicModal::Registration(context.clone()))>
                "Register interest →"
            </button>
        </div>
    }
}

#[component]
pub fn PublicSite() -> impl IntoView {
    let ctx = use_site();
    let site_title = ctx.config.site_title.clone();
    let data = create_memo(move |_| ctx.data());
    let (modal, set_modal) = create_signal(PublicModal::Closed);
    let close = Callback::new(move |_| set_modal.set(PublicModal::Closed));

    let featured = move || data.with(|d| d.featured_event().cloned().unwrap_or_else(Event::placeholder));
    let has_quiz = move || data.with(|d| !d.quizzes.is_empty());

    view! {
        <div class="public-site">
            <header class="site-header">
                <a class="site-logo" href="#home">{site_title}</a>
                <nav class="site-nav">
                    <a href="#events">"Events"</a>
                    <a href="#competitions">"Competitions"</a>
                    <a href="#quiz">"Quiz"</a>
                    <a href="#news">"News"</a>
                    <a href="#gallery">"Gallery"</a>
                    <a href="#about">"About"</a>
                    <a href="#membership">"Membership"</a>
                    <a href="#contact">"Contact"</a>
                </nav>
            </header>

            // 注目イベント
            <section id="home" class="hero">
                {move || {
                    let event = featured();
                    let context = RegistrationContext::for_event(&event);
                    view! {
                        <div class="hero-content">
                            <span class="eyebrow">"Featured Event"</span>
                            <h1>{event.title.clone()}</h1>
                            <p class="hero-meta">{format!("{} · {} · {}", event.date, event.time, event.location)}</p>
                            <p class="hero-description">{event.description.clone()}</p>
                            <button class="btn-primary"
                                on:click=move |_| set_modal.set(PublicModal::Registration(context.clone()))>
                                "Register Now"
                            </button>
                        </div>
                    }
                }}
            </section>

            <section id="events" class="section">
                <h2 class="section-title">"Upcoming Events"</h2>
                <div class="card-grid">
                    {move || data.with(|d| {
                        d.upcoming_events()
                            .into_iter()
                            .map(|e| event_card(e.clone(), set_modal))
                            .collect_view()
                    })}
                </div>
            </section>

            <section id="competitions" class="section">
                <h2 class="section-title">"Competitions"</h2>
                {move || data.with(|d| match d.competitions.first().cloned() {
                    None => view! { <p class="empty-state">"No competitions open right now."</p> }.into_view(),
                    Some(comp) => {
                        let context = RegistrationContext::for_competition(Some(&comp));
                        view! {
                            <div class="competition-card">
                                {comp.image.clone().map(|src| view! { <img class="card-image" src=src alt=comp.title.clone() /> })}
                                <h3>{comp.title.clone()}</h3>
                                <p class="card-meta">"Deadline: " {comp.deadline.clone()}</p>
                                <p class="card-body">{comp.description.clone()}</p>
                                <div class="pill-row">
                                    {comp.categories.iter().map(|c| view! { <span class="pill">{c.clone()}</span> }).collect_view()}
                                </div>
                                <div class="card-actions">
                                    <button class="btn-primary"
                                        on:click=move |_| set_modal.set(PublicModal::Registration(context.clone()))>
                                        "Register"
                                    </button>
                                    {comp.rules_link.clone().map(|href| view! {
                                        <a class="btn-secondary" href=href target="_blank" rel="noopener">"Rules"</a>
                                    })}
                                    {comp.submission_link.clone().map(|href| view! {
                                        <a class="btn-secondary" href=href target="_blank" rel="noopener">"Submit Entry"</a>
                                    })}
                                </div>
                            </div>
                        }
                        .into_view()
                    }
                })}
            </section>

            <section id="quiz" class="section">
                <h2 class="section-title">"Test Your Astro Knowledge"</h2>
                {move || data.with(|d| {
                    let (title, description) = match d.quizzes.first() {
                        Some(q) => (q.title.clone(), q.description.clone()),
                        None => (
                            "No quiz published yet".to_string(),
                            "Admins can add quizzes from the dashboard.".to_string(),
                        ),
                    };
                    view! {
                        <div class="quiz-teaser">
                            <p class="eyebrow">"Active quiz"</p>
                            <h3>{title}</h3>
                            <p>{description}</p>
                        </div>
                    }
                })}
                <button class="btn-primary" disabled=move || !has_quiz()
                    on:click=move |_| set_modal.set(PublicModal::Quiz)>
                    "Start Quiz"
                </button>
            </section>

            <section id="news" class="section">
                <h2 class="section-title">"Latest Updates"</h2>
                <div class="card-grid">
                    {move || data.with(|d| d.news.iter().map(|n| view! {
                        <article class="news-card">
                            {n.image.clone().map(|src| view! { <img class="card-image" src=src alt=n.title.clone() /> })}
                            <p class="card-meta">{format!("{} · {}", n.date, n.category)}</p>
                            <h3>{n.title.clone()}</h3>
                            <p class="card-body">{n.description.clone()}</p>
                        </article>
                    }).collect_view())}
                </div>
            </section>

            <section id="gallery" class="section">
                <h2 class="section-title">"Gallery"</h2>
                <div class="gallery-grid">
                    {move || data.with(|d| d.gallery.iter().enumerate().map(|(i, img)| {
                        // 1枚目と6枚目は大きく表示
                        let class = if i == 0 || i == 5 { "gallery-item wide" } else { "gallery-item" };
                        view! {
                            <figure class=class>
                                <img src=img.src.clone() alt=img.alt.clone() />
                                <figcaption>
                                    <span class="eyebrow">{img.category.clone()}</span>
                                    <span>{img.alt.clone()}</span>
                                </figcaption>
                            </figure>
                        }
                    }).collect_view())}
                </div>
            </section>

            <section id="about" class="section">
                <h2 class="section-title">"Our Team"</h2>
                <div class="card-grid">
                    {move || data.with(|d| d.team.iter().map(|m| view! {
                        <div class="team-card">
                            {m.image.clone().map(|src| view! { <img class="avatar" src=src alt=m.name.clone() /> })}
                            <h4>{m.name.clone()}</h4>
                            <p>{m.role.clone()}</p>
                            <span class="pill">{m.member_type.as_str()}</span>
                        </div>
                    }).collect_view())}
                </div>

                <h2 class="section-title">"Achievements"</h2>
                <div class="card-grid">
                    {move || data.with(achievement_cards)}
                </div>
            </section>

            <section id="membership" class="section">
                <h2 class="section-title">"Membership"</h2>
                <p>"Membership requests are reviewed by the admin team and updated in the dashboard."</p>
                <button class="btn-primary" on:click=move |_| set_modal.set(PublicModal::Membership)>
                    "Apply for Membership"
                </button>
            </section>

            <ContactSection />

            {move || match modal.get() {
                PublicModal::Closed => ().into_view(),
                PublicModal::Quiz => view! { <QuizRunner on_close=close /> }.into_view(),
                PublicModal::Membership => view! { <MembershipModal on_close=close /> }.into_view(),
                PublicModal::Registration(context) => view! {
                    <RegistrationModal context=context on_close=close />
                }.into_view(),
            }}
        </div>
    }
}

fn achievement_cards(data: &SiteData) -> View {
    data.achievements
        .iter()
        .map(|a| {
            view! {
                <div class="achievement-card">
                    <span class="pill">{a.year.clone()}</span>
                    <h4>{a.title.clone()}</h4>
                    <p class="card-meta">{a.category.clone()}</p>
                    <p class="card-body">{a.description.clone()}</p>
                </div>
            }
        })
        .collect_view()
}
