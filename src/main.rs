use leptos::*;

mod admin;
mod auth;
mod components;
mod config;
mod errors;
mod models;
mod quiz;
mod store;
mod submissions;
mod utils;
mod views;

use components::LoginModal;
use config::SiteConfig;
use models::SiteData;
use store::{BrowserStorage, SiteStore};
use utils::log_trace::log_info;
use views::{AdminDashboard, PublicSite};

// ============================================
// 共有コンテキスト
// ============================================

/// 全コンポーネントで共有するストアと設定
#[derive(Clone)]
pub struct SiteContext {
    pub store: SiteStore,
    pub config: SiteConfig,
    /// ストアへ書き込むたびに進める。公開ページはこれを見て読み直す
    pub revision: RwSignal<u64>,
}

impl SiteContext {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            store: SiteStore::new(BrowserStorage, config.storage_key.clone()),
            config,
            revision: create_rw_signal(0),
        }
    }

    /// 現在のドキュメント（リアクティブに追跡される）
    pub fn data(&self) -> SiteData {
        let _ = self.revision.get();
        self.store.get_data()
    }

    pub fn mark_changed(&self) {
        self.revision.update(|r| *r += 1);
    }
}

pub fn use_site() -> SiteContext {
    use_context::<SiteContext>().expect("SiteContext not found")
}

// ============================================
// メインアプリ（公開ページ / 管理画面）
// ============================================

#[component]
fn App() -> impl IntoView {
    let ctx = SiteContext::new(SiteConfig::from_build_env());
    let entry_requested = auth::entry_token_in_location(&ctx.config);
    provide_context(ctx.clone());

    let (is_admin, set_is_admin) = create_signal(false);
    let (show_login, set_show_login) = create_signal(entry_requested);

    let on_login = move || {
        set_is_admin.set(true);
        set_show_login.set(false);
        auth::strip_admin_param();
        log_info("admin", "admin mode entered");
    };

    let on_close = move || {
        set_show_login.set(false);
        auth::strip_admin_param();
    };

    let ctx_logout = ctx.clone();
    let on_logout = move || {
        set_is_admin.set(false);
        // 管理画面での変更を公開ページに反映
        ctx_logout.mark_changed();
        log_info("admin", "admin mode left");
    };

    view! {
        <div class="app">
            {move || {
                let on_logout = on_logout.clone();
                if is_admin.get() {
                    view! { <AdminDashboard on_logout=on_logout /> }.into_view()
                } else {
                    view! { <PublicSite /> }.into_view()
                }
            }}

            {move || show_login.get().then(|| view! {
                <LoginModal on_login=on_login on_close=on_close />
            })}
        </div>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    mount_to_body(App);
}
