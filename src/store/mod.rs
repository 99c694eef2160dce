//! データストアモジュール
//!
//! 1つのJSONドキュメントを固定キーでストレージに保存する。
//! 読み取りは既定データの上に保存内容をトップレベルだけ上書きしたもの、
//! 書き込みは常にドキュメント全体の置き換え。
//!
//! 単一タブ・単一利用者の前提。複数タブから同じキーに書き込むと
//! 後から書いた方が勝つ（バージョン管理・ロックはしない）。

pub mod backend;
pub mod seed;

use serde_json::{json, Map, Value};

use crate::errors::StoreError;
use crate::models::{
    Achievement, Competition, ContactMessage, Event, GalleryImage, Magazine, Membership, NewsItem,
    Quiz, QuizAttempt, Record, Registration, Resource, SiteData, TeamMember,
};
use crate::utils::log_trace::{log_info_with_data, log_warn};

pub use backend::{BrowserStorage, DetachedStorage, KeyValueStorage};
#[cfg(test)]
pub use backend::MemoryStorage;

/// ブラウザ用のストア
pub type SiteStore = Store<BrowserStorage>;

/// 読み込み結果
///
/// `document` は保存内容そのまま（型に合わないコレクションも生の値で残す）。
/// `data` では型に合わないコレクションだけ既定データに置き換わっている。
struct Loaded {
    document: Map<String, Value>,
    data: SiteData,
    unreadable: Vec<(&'static str, serde_json::Error)>,
    discarded: Option<StoreError>,
}

#[derive(Debug, Clone)]
pub struct Store<S> {
    backend: S,
    key: String,
}

// 名前付きの get/save/delete を生成
macro_rules! collection_api {
    (upsert $ty:ty => $get:ident, $save:ident, $delete:ident) => {
        pub fn $get(&self) -> Vec<$ty> {
            self.list::<$ty>()
        }

        pub fn $save(&self, item: $ty) -> Result<(), StoreError> {
            self.upsert(item)
        }

        pub fn $delete(&self, id: &str) -> Result<bool, StoreError> {
            self.remove::<$ty>(id)
        }
    };
    (append $ty:ty => $get:ident, $save:ident, $delete:ident) => {
        pub fn $get(&self) -> Vec<$ty> {
            self.list::<$ty>()
        }

        pub fn $save(&self, item: $ty) -> Result<(), StoreError> {
            self.append(item)
        }

        pub fn $delete(&self, id: &str) -> Result<bool, StoreError> {
            self.remove::<$ty>(id)
        }
    };
}

impl<S: KeyValueStorage> Store<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self { backend, key: key.into() }
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    // ============================================
    // ドキュメント全体
    // ============================================

    /// 現在のドキュメント（既定データ + 保存内容）
    pub fn get_data(&self) -> SiteData {
        self.load().data
    }

    /// 保存内容が読めるかどうか。読めない部分は読み取り時に既定データになる
    pub fn check(&self) -> Result<(), StoreError> {
        let loaded = self.load();
        let problem = match (loaded.discarded, loaded.unreadable.into_iter().next()) {
            (Some(e), _) => e,
            (None, Some((collection, source))) => StoreError::Decode { collection, source },
            (None, None) => return Ok(()),
        };
        log_warn("store", &format!("showing defaults for unreadable data: {}", problem));
        Err(problem)
    }

    /// `partial` のトップレベルキーを現在のドキュメントに上書きして保存
    pub fn save_data(&self, partial: Map<String, Value>) -> Result<(), StoreError> {
        let keys: Vec<String> = partial.keys().cloned().collect();
        let loaded = self.load();
        if let Some(e) = &loaded.discarded {
            log_warn("store", &format!("overwriting unreadable document: {}", e));
        }
        for (collection, _) in loaded.unreadable.iter().filter(|(k, _)| partial.contains_key(*k)) {
            log_warn("store", &format!("replacing unreadable {} with the edited list", collection));
        }

        let mut document = loaded.document;
        document.extend(partial);
        let text = serde_json::to_string(&Value::Object(document)).map_err(StoreError::Encode)?;
        self.backend.set_item(&self.key, &text)?;
        log_info_with_data("store", "document saved", json!({ "keys": keys, "bytes": text.len() }));
        Ok(())
    }

    /// 保存内容を消す（以後の読み取りは既定データ）
    pub fn reset(&self) {
        self.backend.remove_item(&self.key);
        log_warn("store", "document reset to defaults");
    }

    /// エクスポート用の整形済みJSON
    pub fn export_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&Value::Object(self.load().document)).map_err(StoreError::Encode)
    }

    fn read_persisted(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let Some(text) = self.backend.get_item(&self.key) else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&text).map_err(StoreError::Corrupt)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(StoreError::NotAnObject),
        }
    }

    /// JSONとして読めない保存内容は無視して既定データを返す（次の書き込みで上書きされる）。
    /// JSONとして読めればトップレベルで既定データに重ね、コレクションごとに型へ読み込む
    fn load(&self) -> Loaded {
        let defaults = seed::default_document();
        let (persisted, discarded) = match self.read_persisted() {
            Ok(persisted) => (persisted, None),
            Err(e) => (None, Some(e)),
        };

        let mut document = defaults.clone();
        if let Some(persisted) = persisted {
            document.extend(persisted);
        }
        let (data, unreadable) = decode_document(&document, &defaults);
        Loaded { document, data, unreadable, discarded }
    }

    // ============================================
    // コレクション単位の操作
    // ============================================

    pub fn list<R: Record>(&self) -> Vec<R> {
        let mut data = self.get_data();
        std::mem::take(R::items_mut(&mut data))
    }

    /// 同じIDがあれば置き換え、なければ末尾に追加
    pub fn upsert<R: Record>(&self, item: R) -> Result<(), StoreError> {
        let mut items = self.list::<R>();
        let id = item.id().to_string();
        match items.iter().position(|r| r.id() == item.id()) {
            Some(index) => items[index] = item,
            None => items.push(item),
        }
        self.write_collection(&items)?;
        log_info_with_data("store", "record saved", json!({ "collection": R::KEY, "id": id }));
        Ok(())
    }

    /// 追記専用。既存レコードは変更しない
    pub fn append<R: Record>(&self, item: R) -> Result<(), StoreError> {
        let mut items = self.list::<R>();
        if items.iter().any(|r| r.id() == item.id()) {
            return Err(StoreError::DuplicateId { collection: R::KEY, id: item.id().to_string() });
        }
        let id = item.id().to_string();
        items.push(item);
        self.write_collection(&items)?;
        log_info_with_data("store", "record appended", json!({ "collection": R::KEY, "id": id }));
        Ok(())
    }

    /// 該当IDを取り除いて保存。該当がなければ何もしない（`false`）
    pub fn remove<R: Record>(&self, id: &str) -> Result<bool, StoreError> {
        let items = self.list::<R>();
        let before = items.len();
        let remaining: Vec<R> = items.into_iter().filter(|r| r.id() != id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.write_collection(&remaining)?;
        log_info_with_data("store", "record deleted", json!({ "collection": R::KEY, "id": id }));
        Ok(true)
    }

    fn write_collection<R: Record>(&self, items: &[R]) -> Result<(), StoreError> {
        let value = serde_json::to_value(items).map_err(StoreError::Encode)?;
        let mut partial = Map::new();
        partial.insert(R::KEY.to_string(), value);
        self.save_data(partial)
    }

    // ============================================
    // コレクション別API
    // ============================================

    collection_api!(upsert Event => get_events, save_event, delete_event);
    collection_api!(upsert NewsItem => get_news, save_news_item, delete_news_item);
    collection_api!(upsert Competition => get_competitions, save_competition, delete_competition);
    collection_api!(upsert GalleryImage => get_gallery, save_gallery_image, delete_gallery_image);
    collection_api!(upsert TeamMember => get_team, save_team_member, delete_team_member);
    collection_api!(upsert Achievement => get_achievements, save_achievement, delete_achievement);
    collection_api!(append ContactMessage => get_messages, save_message, delete_message);
    collection_api!(upsert Registration => get_registrations, save_registration, delete_registration);
    collection_api!(upsert Quiz => get_quizzes, save_quiz, delete_quiz);
    collection_api!(append QuizAttempt => get_quiz_attempts, save_quiz_attempt, delete_quiz_attempt);
    collection_api!(upsert Membership => get_memberships, save_membership, delete_membership);

    pub fn get_magazines(&self) -> Vec<Magazine> {
        self.list::<Magazine>()
    }

    pub fn get_resources(&self) -> Vec<Resource> {
        self.list::<Resource>()
    }
}

/// コレクションごとに読み込む。型に合わないキーは既定データで代用し、キー名とエラーを返す
fn decode_document(
    document: &Map<String, Value>,
    defaults: &Map<String, Value>,
) -> (SiteData, Vec<(&'static str, serde_json::Error)>) {
    let mut data = SiteData::default();
    let mut unreadable = Vec::new();
    decode_collection::<Event>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<NewsItem>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<Competition>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<GalleryImage>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<TeamMember>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<Magazine>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<Achievement>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<Resource>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<ContactMessage>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<Registration>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<Quiz>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<QuizAttempt>(document, defaults, &mut data, &mut unreadable);
    decode_collection::<Membership>(document, defaults, &mut data, &mut unreadable);
    (data, unreadable)
}

fn decode_collection<R: Record>(
    document: &Map<String, Value>,
    defaults: &Map<String, Value>,
    data: &mut SiteData,
    unreadable: &mut Vec<(&'static str, serde_json::Error)>,
) {
    let items = match document.get(R::KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => match serde_json::from_value::<Vec<R>>(value.clone()) {
            Ok(items) => items,
            Err(e) => {
                unreadable.push((R::KEY, e));
                defaults
                    .get(R::KEY)
                    .and_then(|v| serde_json::from_value::<Vec<R>>(v.clone()).ok())
                    .unwrap_or_default()
            }
        },
    };
    *R::items_mut(data) = items;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReviewStatus, TeamType};

    fn store() -> Store<MemoryStorage> {
        Store::new(MemoryStorage::new(), "test_key")
    }

    fn member(id: &str, name: &str) -> TeamMember {
        TeamMember { id: id.into(), name: name.into(), role: "Member".into(), ..Default::default() }
    }

    #[test]
    fn test_empty_storage_returns_defaults() {
        let store = store();
        assert_eq!(store.get_data(), seed::default_data());
        assert_eq!(store.get_events().len(), 5);
    }

    #[test]
    fn test_upsert_appends_then_replaces() {
        let store = store();
        store.save_team_member(member("t1", "Vega")).unwrap();
        store.save_team_member(member("t1", "Altair")).unwrap();

        let team = store.get_team();
        let matching: Vec<&TeamMember> = team.iter().filter(|m| m.id == "t1").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "Altair");
        assert_eq!(team.len(), 7);
        assert_eq!(team.last().map(|m| m.id.as_str()), Some("t1"));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let store = store();
        let mut first = store.get_team()[0].clone();
        first.member_type = TeamType::Past;
        store.save_team_member(first).unwrap();
        assert_eq!(store.get_team()[0].member_type, TeamType::Past);
        assert_eq!(store.get_team()[0].id, "1");
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let store = store();
        let before = store.get_news();
        assert!(!store.delete_news_item("missing").unwrap());
        assert_eq!(store.get_news(), before);
    }

    #[test]
    fn test_delete_removes_only_matching_record() {
        let store = store();
        assert!(store.delete_event("3").unwrap());
        let ids: Vec<String> = store.get_events().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1", "2", "4", "5"]);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let store = store();
        store.delete_event("1").unwrap();
        store.save_team_member(member("t9", "Deneb")).unwrap();
        store.reset();
        assert_eq!(store.get_data(), seed::default_data());
    }

    #[test]
    fn test_persisted_key_replaces_default_collection_wholesale() {
        let storage = MemoryStorage::new();
        storage
            .set_item("test_key", r#"{"events":[{"id":"x","title":"Only one"}]}"#)
            .unwrap();
        let store = Store::new(storage, "test_key");
        let events = store.get_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Only one");
        // 他のコレクションは既定データのまま
        assert_eq!(store.get_team().len(), 6);
    }

    #[test]
    fn test_save_data_keeps_unknown_keys() {
        let storage = MemoryStorage::new();
        storage.set_item("test_key", r#"{"theme":"dark"}"#).unwrap();
        let store = Store::new(storage.clone(), "test_key");
        store.save_event(Event { id: "e9".into(), ..Default::default() }).unwrap();

        let raw: Value = serde_json::from_str(&storage.get_item("test_key").unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["events"].as_array().map(Vec::len), Some(6));
        assert!(raw.get("magazines").is_some());
    }

    #[test]
    fn test_corrupt_document_falls_back_and_is_overwritten() {
        let storage = MemoryStorage::new();
        storage.set_item("test_key", "{not json").unwrap();
        let store = Store::new(storage.clone(), "test_key");

        assert!(matches!(store.check(), Err(StoreError::Corrupt(_))));
        assert_eq!(store.get_data(), seed::default_data());

        store.save_news_item(NewsItem { id: "n9".into(), ..Default::default() }).unwrap();
        assert!(store.check().is_ok());
        assert_eq!(store.get_news().len(), 4);
    }

    #[test]
    fn test_wrong_shape_is_treated_as_corrupt() {
        let storage = MemoryStorage::new();
        storage.set_item("test_key", r#"{"events":"oops"}"#).unwrap();
        let store = Store::new(storage.clone(), "test_key");
        assert!(matches!(store.check(), Err(StoreError::Decode { collection: "events", .. })));
        assert_eq!(store.get_events().len(), 5);

        storage.set_item("test_key", "[1,2]").unwrap();
        assert!(matches!(store.check(), Err(StoreError::NotAnObject)));
    }

    #[test]
    fn test_bad_collection_does_not_drop_the_others() {
        let storage = MemoryStorage::new();
        let membership = Membership {
            id: "m1".into(),
            name: "Rigel".into(),
            email: "rigel@example.com".into(),
            date: "2025-01-05".into(),
            ..Default::default()
        };
        let message = ContactMessage { id: "c1".into(), name: "Mira".into(), ..Default::default() };
        let document = json!({
            "events": [{ "id": "x", "category": "lecture" }],
            "memberships": [membership.clone()],
            "messages": [message.clone()],
        });
        storage.set_item("test_key", &document.to_string()).unwrap();
        let store = Store::new(storage.clone(), "test_key");

        assert!(matches!(store.check(), Err(StoreError::Decode { collection: "events", .. })));
        assert_eq!(store.get_events().len(), 5);
        assert_eq!(store.get_memberships(), vec![membership.clone()]);

        store.save_news_item(NewsItem { id: "n9".into(), ..Default::default() }).unwrap();

        let raw: Value = serde_json::from_str(&storage.get_item("test_key").unwrap()).unwrap();
        assert_eq!(raw["memberships"][0]["id"], "m1");
        assert_eq!(raw["messages"][0]["id"], "c1");
        // 読めなかったイベントも書き換えていない
        assert_eq!(raw["events"][0]["category"], "lecture");
        assert_eq!(store.get_memberships(), vec![membership]);
        assert_eq!(store.get_messages(), vec![message]);
    }

    #[test]
    fn test_editing_bad_collection_replaces_it() {
        let storage = MemoryStorage::new();
        storage
            .set_item("test_key", r#"{"events":[{"id":"x","category":"lecture"}]}"#)
            .unwrap();
        let store = Store::new(storage, "test_key");
        store.save_event(Event { id: "e9".into(), ..Default::default() }).unwrap();

        assert!(store.check().is_ok());
        let events = store.get_events();
        assert_eq!(events.len(), 6);
        assert_eq!(events.last().map(|e| e.id.as_str()), Some("e9"));
    }

    #[test]
    fn test_reads_of_corrupt_document_do_not_log() {
        use crate::utils::log_trace::{clear_logs, get_logs_json, LogEntry};

        let storage = MemoryStorage::new();
        storage.set_item("test_key", "{not json").unwrap();
        let store = Store::new(storage, "test_key");
        clear_logs();

        for _ in 0..5 {
            let _ = store.get_data();
            let _ = store.get_events();
        }
        let logs: Vec<LogEntry> = serde_json::from_str(&get_logs_json()).unwrap();
        assert!(logs.is_empty());

        assert!(store.check().is_err());
        let logs: Vec<LogEntry> = serde_json::from_str(&get_logs_json()).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, "warn");
    }

    #[test]
    fn test_detached_storage_reads_defaults_and_ignores_writes() {
        let store = Store::new(DetachedStorage, "test_key");
        store.save_event(Event { id: "e9".into(), ..Default::default() }).unwrap();
        assert_eq!(store.get_events().len(), 5);
        store.reset();
        assert_eq!(store.get_data(), seed::default_data());
    }

    #[test]
    fn test_append_only_refuses_duplicate_ids() {
        let store = store();
        let message = ContactMessage { id: "m1".into(), name: "Lyra".into(), ..Default::default() };
        store.save_message(message.clone()).unwrap();
        let again = ContactMessage { name: "Changed".into(), ..message };
        assert!(matches!(store.save_message(again), Err(StoreError::DuplicateId { .. })));

        let messages = store.get_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].name, "Lyra");
    }

    #[test]
    fn test_status_only_upsert_keeps_other_fields() {
        let store = store();
        let original = store.get_registrations()[0].clone();
        store
            .save_registration(Registration { status: ReviewStatus::Approved, ..original.clone() })
            .unwrap();
        let updated = store.get_registrations()[0].clone();
        assert_eq!(updated.status, ReviewStatus::Approved);
        assert_eq!(Registration { status: ReviewStatus::Pending, ..updated }, original);
    }

    #[test]
    fn test_forward_compatible_collections_are_readable() {
        let store = store();
        assert_eq!(store.get_magazines().len(), 1);
        assert_eq!(store.get_resources().len(), 6);
    }

    #[test]
    fn test_export_json_is_full_document() {
        let store = store();
        let exported: Value = serde_json::from_str(&store.export_json().unwrap()).unwrap();
        assert_eq!(exported.as_object().map(Map::len), Some(13));
    }
}
