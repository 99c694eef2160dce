//! 数秒で消える通知トースト

use leptos::*;

use crate::admin::{Notice, NoticeKind};

/// 新しい通知ごとに1回だけタイマーを張り、時間が来たら `on_expire(id)` を呼ぶ
#[component]
pub fn NoticeToast<F>(
    #[prop(into)] notice: Signal<Option<Notice>>,
    duration_ms: u32,
    on_expire: F,
) -> impl IntoView
where
    F: Fn(u64) + Copy + 'static,
{
    // 同じ通知のまま他の状態が変わってもタイマーを増やさない
    let notice_id = create_memo(move |_| notice.with(|n| n.as_ref().map(|n| n.id)));

    create_effect(move |_| {
        if let Some(id) = notice_id.get() {
            spawn_local(async move {
                gloo::timers::future::TimeoutFuture::new(duration_ms).await;
                on_expire(id);
            });
        }
    });

    view! {
        {move || notice.get().map(|n| {
            let class = match n.kind {
                NoticeKind::Success => "notice-toast success",
                NoticeKind::Error => "notice-toast error",
            };
            view! { <div class=class>{n.text}</div> }
        })}
    }
}
