//! 時系列トレースログシステム
//! ストア書き込み・管理操作・クイズ提出を記録し、後から確認できるようにする

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::store::KeyValueStorage;

const MAX_LOG_ENTRIES: usize = 1000;
const STORAGE_KEY: &str = "anadameth_astronomy_society_log_trace";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,    // "info", "warn", "error"
    pub category: String, // "store", "admin", "quiz", "public"
    pub message: String,
    pub data: Option<serde_json::Value>,
}

pub struct LogTrace<S> {
    logs: VecDeque<LogEntry>,
    storage: S,
}

impl<S: KeyValueStorage> LogTrace<S> {
    pub fn new(storage: S) -> Self {
        let mut trace = LogTrace {
            logs: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            storage,
        };
        trace.load_from_storage();
        trace
    }

    pub fn log(&mut self, level: &str, category: &str, message: &str, data: Option<serde_json::Value>) {
        let timestamp = chrono::Utc::now().to_rfc3339();

        // コンソールにも出力（ブラウザでは console_log 経由）
        match level {
            "error" => log::error!("[{}] {}", category, message),
            "warn" => log::warn!("[{}] {}", category, message),
            _ => log::info!("[{}] {}", category, message),
        }

        if self.logs.len() >= MAX_LOG_ENTRIES {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            timestamp,
            level: level.to_string(),
            category: category.to_string(),
            message: message.to_string(),
            data,
        });

        self.save_to_storage();
    }

    #[cfg(test)]
    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    pub fn get_logs_json(&self) -> String {
        let logs: Vec<&LogEntry> = self.logs.iter().collect();
        serde_json::to_string_pretty(&logs).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn clear(&mut self) {
        self.logs.clear();
        self.save_to_storage();
    }

    fn load_from_storage(&mut self) {
        if let Some(json_str) = self.storage.get_item(STORAGE_KEY) {
            if let Ok(logs) = serde_json::from_str::<Vec<LogEntry>>(&json_str) {
                self.logs = logs.into_iter().collect();
            }
        }
    }

    fn save_to_storage(&self) {
        let json_str = serde_json::to_string(&self.logs).unwrap_or_else(|_| "[]".to_string());
        // ログの保存失敗は無視（容量超過でアプリを止めない）
        let _ = self.storage.set_item(STORAGE_KEY, &json_str);
    }
}

// グローバルなログトレースインスタンス
#[cfg(target_arch = "wasm32")]
type TraceStorage = crate::store::BrowserStorage;
#[cfg(not(target_arch = "wasm32"))]
type TraceStorage = crate::store::DetachedStorage;

thread_local! {
    static LOG_TRACE: std::cell::RefCell<LogTrace<TraceStorage>> =
        std::cell::RefCell::new(LogTrace::new(TraceStorage::default()));
}

pub fn log_info(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log("info", category, message, None);
    });
}

pub fn log_info_with_data(category: &str, message: &str, data: serde_json::Value) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log("info", category, message, Some(data));
    });
}

pub fn log_warn(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log("warn", category, message, None);
    });
}

pub fn log_error(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log("error", category, message, None);
    });
}

pub fn clear_logs() {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().clear();
    });
}

pub fn get_logs_json() -> String {
    LOG_TRACE.with(|trace| trace.borrow().get_logs_json())
}
