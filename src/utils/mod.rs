//! ユーティリティモジュール

pub mod log_trace;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// 共通ヘルパー

/// 新規レコードのID（作成時刻のミリ秒）
///
/// 単一タブでの手操作を前提にしている。同じミリ秒に2件作ると衝突する。
pub fn new_record_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// 今日の日付（UTC, YYYY-MM-DD）
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// 空白だけの入力は未入力として扱う
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// JSON文字列をファイルとしてダウンロードさせる
pub fn download_json(filename: &str, json_str: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            let blob_parts = js_sys::Array::new();
            blob_parts.push(&JsValue::from_str(json_str));

            let options = web_sys::BlobPropertyBag::new();
            options.set_type("application/json");

            if let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options) {
                if let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) {
                    if let Ok(a) = document.create_element("a") {
                        let _ = a.set_attribute("href", &url);
                        let _ = a.set_attribute("download", filename);
                        if let Some(element) = a.dyn_ref::<web_sys::HtmlElement>() {
                            element.click();
                        }
                        let _ = web_sys::Url::revoke_object_url(&url);
                    }
                }
            }
        }
    }
}

/// ブラウザの確認ダイアログ。ダイアログが出せなければ false
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// ダウンロード用のファイル名（`prefix_2026-02-20T10-00-00.json`）
pub fn timestamped_filename(prefix: &str) -> String {
    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S");
    format!("{}_{}.json", prefix, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_new_record_id_is_numeric() {
        assert!(new_record_id().parse::<i64>().is_ok());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  Vega "), Some("Vega".to_string()));
        assert_eq!(non_empty("   "), None);
    }

    #[test]
    fn test_timestamped_filename() {
        let name = timestamped_filename("site_data");
        assert!(name.starts_with("site_data_"));
        assert!(name.ends_with(".json"));
        assert!(!name.contains(':'));
    }
}
