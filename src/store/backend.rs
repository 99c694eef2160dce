//! キー・バリュー型ストレージの抽象
//!
//! ブラウザでは localStorage、テストではメモリ上のマップを使う。

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::rc::Rc;

use crate::errors::StoreError;

/// 文字列キーに文字列を保存するストレージ
///
/// ストレージ自体が使えない環境では `get_item` は `None`、
/// 書き込み・削除は何もしない（エラーにしない）。
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str);
}

/// ブラウザの localStorage
///
/// 呼び出しのたびに `window.localStorage` を取りに行く。
/// window がない・ストレージが無効な場合は読み取りは空、書き込みは無視。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        window.local_storage().ok()?
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match Self::storage() {
            Some(storage) => storage
                .set_item(key, value)
                .map_err(|e| StoreError::Write(format!("{:?}", e))),
            None => Ok(()),
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// メモリ上のストレージ（クローンは同じ中身を共有する）
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// 永続化できない環境（読み取りは常に空、書き込みは無視）
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedStorage;

impl KeyValueStorage for DetachedStorage {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) {}
}
