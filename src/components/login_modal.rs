//! 管理ログインモーダル

use leptos::*;

use crate::auth::verify_password;
use crate::use_site;
use crate::utils::log_trace::log_warn;

#[component]
pub fn LoginModal<L, C>(on_login: L, on_close: C) -> impl IntoView
where
    L: Fn() + Copy + 'static,
    C: Fn() + Copy + 'static,
{
    let ctx = use_site();
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<&'static str>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if verify_password(&ctx.config, &password.get()) {
            on_login();
        } else {
            log_warn("admin", "admin login rejected");
            set_error.set(Some("Invalid password"));
        }
    };

    view! {
        <div class="modal-overlay">
            <div class="modal login-modal">
                <button class="modal-close" on:click=move |_| on_close()>"✕"</button>
                <h2>"Admin Login"</h2>
                <p class="modal-subtitle">"Enter password to access dashboard"</p>

                <form on:submit=on_submit>
                    <input
                        type="password"
                        class="input-field"
                        placeholder="••••••••"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                    {move || error.get().map(|e| view! { <p class="status error">{e}</p> })}
                    <button type="submit" class="btn-primary">"Login"</button>
                </form>
            </div>
        </div>
    }
}
