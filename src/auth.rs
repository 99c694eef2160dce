//! 管理画面への入口
//!
//! `?admin_entry=<token>` 付きで開くとログイン画面を出し、パスワードが合えば
//! そのページを開いている間だけ管理モードになる（リロードで解除）。
//! トークンもパスワードもWASMに埋め込まれているので、目隠し程度のもので
//! アクセス制御ではない。

use wasm_bindgen::JsValue;

use crate::config::SiteConfig;

/// 入口を示すクエリパラメータ名
pub const ADMIN_ENTRY_PARAM: &str = "admin_entry";

/// `?a=1&b=2` 形式の文字列から値を取り出す
pub fn query_param(search: &str, name: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// パラメータを1つ取り除いたクエリ文字列（空なら ""）
pub fn without_param(search: &str, name: &str) -> String {
    let rest: Vec<&str> = search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(name))
        .collect();
    if rest.is_empty() {
        String::new()
    } else {
        format!("?{}", rest.join("&"))
    }
}

pub fn admin_entry_requested(search: &str, token: &str) -> bool {
    query_param(search, ADMIN_ENTRY_PARAM).as_deref() == Some(token)
}

pub fn verify_password(config: &SiteConfig, input: &str) -> bool {
    input == config.admin_password
}

/// 現在のURLに入口トークンが付いているか
pub fn entry_token_in_location(config: &SiteConfig) -> bool {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map_or(false, |search| admin_entry_requested(&search, &config.admin_entry_token))
}

/// 履歴を増やさずにURLから入口パラメータを消す
pub fn strip_admin_param() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let (Ok(pathname), Ok(search)) = (location.pathname(), location.search()) else {
        return;
    };
    let hash = location.hash().unwrap_or_default();
    let url = format!("{}{}{}", pathname, without_param(&search, ADMIN_ENTRY_PARAM), hash);
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_token_detection() {
        assert!(admin_entry_requested("?admin_entry=astro-secure-entry", "astro-secure-entry"));
        assert!(admin_entry_requested("?tab=news&admin_entry=astro-secure-entry", "astro-secure-entry"));
        assert!(!admin_entry_requested("?admin_entry=wrong", "astro-secure-entry"));
        assert!(!admin_entry_requested("", "astro-secure-entry"));
        assert!(!admin_entry_requested("?admin_entry", "astro-secure-entry"));
    }

    #[test]
    fn test_without_param_keeps_others() {
        assert_eq!(without_param("?admin_entry=x", ADMIN_ENTRY_PARAM), "");
        assert_eq!(without_param("?a=1&admin_entry=x&b=2", ADMIN_ENTRY_PARAM), "?a=1&b=2");
        assert_eq!(without_param("", ADMIN_ENTRY_PARAM), "");
    }

    #[test]
    fn test_password() {
        let config = SiteConfig::default();
        assert!(verify_password(&config, "amccastro99"));
        assert!(!verify_password(&config, "amccastro99 "));
    }
}
