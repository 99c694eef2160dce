//! サイト設定
//!
//! 値はビルド時の環境変数で上書きできる（`build.rs` が再ビルド対象に登録）。
//! 管理者パスワードはWASMバイナリに埋め込まれるので秘密ではない。

/// localStorage のキー（既定値）
pub const DEFAULT_STORAGE_KEY: &str = "anadameth_astronomy_society_data";
/// 管理ログインを表示する `?admin_entry=` の値（既定値）
pub const DEFAULT_ADMIN_ENTRY_TOKEN: &str = "astro-secure-entry";
pub const DEFAULT_ADMIN_PASSWORD: &str = "amccastro99";
/// 通知トーストの表示時間（ミリ秒）
pub const DEFAULT_NOTICE_MS: u32 = 3000;
pub const DEFAULT_SITE_TITLE: &str = "Anadameth Astronomical Society";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub storage_key: String,
    pub admin_entry_token: String,
    pub admin_password: String,
    pub notice_ms: u32,
    pub site_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            admin_entry_token: DEFAULT_ADMIN_ENTRY_TOKEN.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            notice_ms: DEFAULT_NOTICE_MS,
            site_title: DEFAULT_SITE_TITLE.to_string(),
        }
    }
}

impl SiteConfig {
    /// ビルド時の環境変数を反映した設定
    pub fn from_build_env() -> Self {
        Self::default().with_overrides(
            option_env!("CLUB_STORAGE_KEY"),
            option_env!("CLUB_ADMIN_ENTRY_TOKEN"),
            option_env!("CLUB_ADMIN_PASSWORD"),
        )
    }

    /// 空文字の上書きは無視する
    fn with_overrides(
        mut self,
        storage_key: Option<&str>,
        entry_token: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        let non_empty = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
        if let Some(key) = non_empty(storage_key) {
            self.storage_key = key;
        }
        if let Some(token) = non_empty(entry_token) {
            self.admin_entry_token = token;
        }
        if let Some(pw) = non_empty(password) {
            self.admin_password = pw;
        }
        self
    }
}

/// 初期データの更新日時（ビルド時に埋め込み）
pub fn format_seed_modified_time() -> String {
    let timestamp: i64 = option_env!("SEED_DATA_MODIFIED")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    if timestamp == 0 {
        return "Seed data: unknown".to_string();
    }
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => format!("Seed data: {}", dt.format("%Y-%m-%d %H:%M UTC")),
        None => "Seed data: unknown".to_string(),
    }
}
