//! 管理ダッシュボードのコントローラ
//!
//! 表示用のスナップショットを持ち、保存・削除のたびにストアから読み直す。
//! 画面（Leptos）はこの構造体を `RwSignal` に入れて操作する。

use serde_json::json;

use super::forms::{build_record, record_to_form, FormValues};
use super::quiz_draft::QuizDraft;
use crate::errors::{DashboardError, FormError, StoreError};
use crate::models::{AnyRecord, Collection, ReviewStatus, SiteData};
use crate::store::{KeyValueStorage, Store};
use crate::utils::log_trace::{log_info_with_data, log_warn};
use crate::utils::new_record_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// 数秒で消える通知。`id` で古いタイマーが新しい通知を消さないようにする
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

/// 追加・編集モーダルの状態
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    pub collection: Collection,
    /// 編集中の元レコード。新規追加なら `None`
    pub editing: Option<AnyRecord>,
    pub values: FormValues,
    pub quiz: QuizDraft,
}

impl Editor {
    pub fn is_new(&self) -> bool {
        self.editing.is_none()
    }
}

pub struct Dashboard<S> {
    store: Store<S>,
    active: Collection,
    snapshot: SiteData,
    search: String,
    editor: Option<Editor>,
    notice: Option<Notice>,
    notice_seq: u64,
}

impl<S: KeyValueStorage> Dashboard<S> {
    pub fn new(store: Store<S>) -> Self {
        let snapshot = store.get_data();
        let mut dashboard = Self {
            store,
            active: Collection::default(),
            snapshot,
            search: String::new(),
            editor: None,
            notice: None,
            notice_seq: 0,
        };
        if let Err(e) = dashboard.store.check() {
            dashboard.notify(NoticeKind::Error, format!("Saved data could not be read, showing defaults ({})", e));
        }
        dashboard
    }

    #[cfg(test)]
    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn snapshot(&self) -> &SiteData {
        &self.snapshot
    }

    /// スナップショットをストアから読み直す
    pub fn reload(&mut self) {
        self.snapshot = self.store.get_data();
    }

    // ============================================
    // タブ・検索
    // ============================================

    pub fn active(&self) -> Collection {
        self.active
    }

    pub fn set_active(&mut self, collection: Collection) {
        self.active = collection;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.snapshot.count(collection)
    }

    /// 選択中タブのうち検索語を含むレコード
    pub fn visible_records(&self) -> Vec<AnyRecord> {
        self.snapshot
            .records(self.active)
            .into_iter()
            .filter(|r| r.matches_search(&self.search))
            .collect()
    }

    // ============================================
    // 追加・編集モーダル
    // ============================================

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn open_add_modal(&mut self) -> Result<(), FormError> {
        if !self.active.is_form_editable() {
            return Err(FormError::NotEditable(self.active.label()));
        }
        self.editor = Some(Editor {
            collection: self.active,
            editing: None,
            values: FormValues::new(),
            quiz: QuizDraft::new(),
        });
        Ok(())
    }

    pub fn open_edit_modal(&mut self, record: AnyRecord) -> Result<(), FormError> {
        let collection = record.collection();
        if !collection.is_form_editable() {
            return Err(FormError::NotEditable(collection.label()));
        }
        let quiz = match &record {
            AnyRecord::Quiz(q) => QuizDraft::from_questions(&q.questions),
            _ => QuizDraft::new(),
        };
        self.editor = Some(Editor {
            collection,
            values: record_to_form(&record),
            editing: Some(record),
            quiz,
        });
        Ok(())
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub fn field_value(&self, name: &str) -> String {
        self.editor.as_ref().map(|e| e.values.get(name).to_string()).unwrap_or_default()
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        if let Some(editor) = self.editor.as_mut() {
            editor.values.set(name, value);
        }
    }

    pub fn quiz_draft(&self) -> Option<&QuizDraft> {
        self.editor.as_ref().map(|e| &e.quiz)
    }

    pub fn quiz_draft_mut(&mut self) -> Option<&mut QuizDraft> {
        self.editor.as_mut().map(|e| &mut e.quiz)
    }

    /// モーダルの内容を保存する。失敗時はモーダルを開いたまま通知を出す
    pub fn handle_save(&mut self) -> Result<String, DashboardError> {
        match self.try_save() {
            Ok(id) => {
                self.editor = None;
                self.reload();
                self.notify(NoticeKind::Success, "Item saved successfully!");
                Ok(id)
            }
            Err(e) => {
                self.notify(NoticeKind::Error, e.to_string());
                Err(e)
            }
        }
    }

    fn try_save(&self) -> Result<String, DashboardError> {
        let editor = self.editor.as_ref().ok_or(FormError::NoOpenForm)?;

        // クイズは問題の検証を先に行う
        let questions = match editor.collection {
            Collection::Quizzes => Some(editor.quiz.finalize()?),
            _ => None,
        };

        let id = editor
            .editing
            .as_ref()
            .map(|r| r.id().to_string())
            .unwrap_or_else(new_record_id);
        let mut record = build_record(editor.collection, editor.editing.as_ref(), &editor.values, &id)?;
        if let (AnyRecord::Quiz(quiz), Some(questions)) = (&mut record, questions) {
            quiz.questions = questions;
        }

        self.save_record(record)?;
        log_info_with_data(
            "admin",
            if editor.is_new() { "record added" } else { "record edited" },
            json!({ "collection": editor.collection.key(), "id": id }),
        );
        Ok(id)
    }

    /// コレクションに応じたストアの保存関数へ振り分ける
    fn save_record(&self, record: AnyRecord) -> Result<(), StoreError> {
        match record {
            AnyRecord::Event(r) => self.store.save_event(r),
            AnyRecord::News(r) => self.store.save_news_item(r),
            AnyRecord::Competition(r) => self.store.save_competition(r),
            AnyRecord::Gallery(r) => self.store.save_gallery_image(r),
            AnyRecord::Team(r) => self.store.save_team_member(r),
            AnyRecord::Achievement(r) => self.store.save_achievement(r),
            AnyRecord::Message(r) => self.store.save_message(r),
            AnyRecord::Registration(r) => self.store.save_registration(r),
            AnyRecord::Quiz(r) => self.store.save_quiz(r),
            AnyRecord::QuizAttempt(r) => self.store.save_quiz_attempt(r),
            AnyRecord::Membership(r) => self.store.save_membership(r),
        }
    }

    // ============================================
    // 削除・審査
    // ============================================

    /// `confirm` が false を返したら何もしない
    pub fn handle_delete(
        &mut self,
        collection: Collection,
        id: &str,
        confirm: impl FnOnce() -> bool,
    ) -> Result<bool, DashboardError> {
        if !confirm() {
            return Ok(false);
        }
        let result = match collection {
            Collection::Events => self.store.delete_event(id),
            Collection::News => self.store.delete_news_item(id),
            Collection::Competitions => self.store.delete_competition(id),
            Collection::Gallery => self.store.delete_gallery_image(id),
            Collection::Team => self.store.delete_team_member(id),
            Collection::Achievements => self.store.delete_achievement(id),
            Collection::Messages => self.store.delete_message(id),
            Collection::Registrations => self.store.delete_registration(id),
            Collection::Quizzes => self.store.delete_quiz(id),
            Collection::QuizAttempts => self.store.delete_quiz_attempt(id),
            Collection::Memberships => self.store.delete_membership(id),
        };
        match result {
            Ok(true) => {
                self.reload();
                self.notify(NoticeKind::Success, "Item deleted successfully!");
                log_info_with_data("admin", "record deleted", json!({ "collection": collection.key(), "id": id }));
                Ok(true)
            }
            Ok(false) => {
                self.reload();
                self.notify(NoticeKind::Error, "Item not found. It may have been deleted already.");
                Ok(false)
            }
            Err(e) => {
                self.notify(NoticeKind::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    /// 申込・入会の承認/却下。status 以外の項目はそのまま保存し直す
    pub fn set_status(
        &mut self,
        collection: Collection,
        id: &str,
        status: ReviewStatus,
    ) -> Result<(), DashboardError> {
        let not_found = || StoreError::NotFound { collection: collection.key(), id: id.to_string() };
        let result = match collection {
            Collection::Registrations => {
                let mut reg = self
                    .snapshot
                    .registrations
                    .iter()
                    .find(|r| r.id == id)
                    .cloned()
                    .ok_or_else(not_found)?;
                reg.status = status;
                self.store.save_registration(reg)
            }
            Collection::Memberships => {
                let mut member = self
                    .snapshot
                    .memberships
                    .iter()
                    .find(|m| m.id == id)
                    .cloned()
                    .ok_or_else(not_found)?;
                member.status = status;
                self.store.save_membership(member)
            }
            other => return Err(FormError::NotReviewable(other.label()).into()),
        };
        match result {
            Ok(()) => {
                self.reload();
                log_info_with_data(
                    "admin",
                    "status changed",
                    json!({ "collection": collection.key(), "id": id, "status": status.as_str() }),
                );
                Ok(())
            }
            Err(e) => {
                self.notify(NoticeKind::Error, e.to_string());
                Err(e.into())
            }
        }
    }

    // ============================================
    // データ管理
    // ============================================

    pub fn export_json(&self) -> Result<String, StoreError> {
        self.store.export_json()
    }

    /// 保存データを消して既定データに戻す
    pub fn reset_store(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        self.store.reset();
        self.editor = None;
        self.reload();
        log_warn("admin", "site data reset from dashboard");
        self.notify(NoticeKind::Success, "Site data reset to defaults.");
        true
    }

    // ============================================
    // 通知
    // ============================================

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        self.notice_seq += 1;
        self.notice = Some(Notice { id: self.notice_seq, kind, text: text.into() });
        self.notice_seq
    }

    /// 同じ通知がまだ出ていれば消す
    pub fn clear_notice(&mut self, id: u64) {
        if self.notice.as_ref().map_or(false, |n| n.id == id) {
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Competition, Membership, Quiz};
    use crate::store::MemoryStorage;

    fn dashboard() -> Dashboard<MemoryStorage> {
        Dashboard::new(Store::new(MemoryStorage::new(), "dash_test"))
    }

    fn fill_question(d: &mut Dashboard<MemoryStorage>, index: usize, text: &str, options: [&str; 4]) {
        let draft = d.quiz_draft_mut().unwrap();
        draft.set_question_text(index, text);
        for (i, opt) in options.iter().enumerate() {
            draft.set_option_text(index, i, opt);
        }
    }

    #[test]
    fn test_add_event_assigns_new_id_and_reloads() {
        let mut d = dashboard();
        d.open_add_modal().unwrap();
        d.set_field("title", "Lunar Eclipse Watch");
        d.set_field("category", "observation");
        let id = d.handle_save().unwrap();

        assert!(d.editor().is_none());
        assert_eq!(d.count(Collection::Events), 6);
        let saved = d.snapshot().events.iter().find(|e| e.id == id).unwrap();
        assert_eq!(saved.title, "Lunar Eclipse Watch");
        assert_eq!(d.notice().map(|n| n.kind), Some(NoticeKind::Success));
    }

    #[test]
    fn test_edit_keeps_id_and_replaces_record() {
        let mut d = dashboard();
        d.set_active(Collection::Competitions);
        let record = d.visible_records()[0].clone();
        d.open_edit_modal(record).unwrap();
        assert_eq!(d.field_value("categories"), "Lunar, Planetary, Deep Sky, Creative");

        d.set_field("categories", "Lunar, Planetary,  Deep Sky");
        let id = d.handle_save().unwrap();
        assert_eq!(id, "1");
        let comps: &Vec<Competition> = &d.snapshot().competitions;
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].categories, vec!["Lunar", "Planetary", "Deep Sky"]);
        assert_eq!(comps[0].image.as_deref(), Some("/images/competition-astrophoto.jpg"));
    }

    #[test]
    fn test_quiz_without_complete_question_is_blocked() {
        let mut d = dashboard();
        d.set_active(Collection::Quizzes);
        d.open_add_modal().unwrap();
        d.set_field("title", "Planets");
        fill_question(&mut d, 0, "Largest planet?", ["Jupiter", "", "Mars", "Venus"]);

        let err = d.handle_save().unwrap_err();
        assert!(matches!(err, DashboardError::Form(FormError::NoCompleteQuestion)));
        assert!(d.editor().is_some());
        assert_eq!(d.count(Collection::Quizzes), 1);
        let notice = d.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Add at least one complete question with 4 options.");
    }

    #[test]
    fn test_quiz_saves_only_complete_questions() {
        let mut d = dashboard();
        d.set_active(Collection::Quizzes);
        d.open_add_modal().unwrap();
        d.set_field("title", "Planets");
        fill_question(&mut d, 0, "Largest planet?", ["Jupiter", "Saturn", "Mars", "Venus"]);
        d.quiz_draft_mut().unwrap().add_question();
        fill_question(&mut d, 1, "", ["a", "b", "c", "d"]);

        let id = d.handle_save().unwrap();
        let quiz: &Quiz = d.snapshot().quiz(&id).unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].question, "Largest planet?");
        assert!(!quiz.created_at.is_empty());
    }

    #[test]
    fn test_non_form_tabs_cannot_open_modal() {
        let mut d = dashboard();
        d.set_active(Collection::Messages);
        assert_eq!(d.open_add_modal(), Err(FormError::NotEditable("Messages")));
        assert!(matches!(d.handle_save(), Err(DashboardError::Form(FormError::NoOpenForm))));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut d = dashboard();
        assert!(!d.handle_delete(Collection::Events, "1", || false).unwrap());
        assert_eq!(d.count(Collection::Events), 5);

        assert!(d.handle_delete(Collection::Events, "1", || true).unwrap());
        assert_eq!(d.count(Collection::Events), 4);
        assert_eq!(d.notice().map(|n| n.text.as_str()), Some("Item deleted successfully!"));
    }

    #[test]
    fn test_delete_unknown_id_reports_not_found() {
        let mut d = dashboard();
        assert!(!d.handle_delete(Collection::Events, "missing", || true).unwrap());
        assert_eq!(d.count(Collection::Events), 5);
        let notice = d.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_ne!(notice.text, "Item deleted successfully!");
    }

    #[test]
    fn test_notice_stays_the_same_while_typing() {
        let mut d = dashboard();
        let id = d.notify(NoticeKind::Success, "Item saved successfully!");
        d.open_add_modal().unwrap();
        d.set_field("title", "Perseids");
        d.set_search("meteor");
        assert_eq!(d.notice().map(|n| n.id), Some(id));

        d.clear_notice(id - 1);
        assert_eq!(d.notice().map(|n| n.id), Some(id));
        d.clear_notice(id);
        assert!(d.notice().is_none());
    }

    #[test]
    fn test_approve_changes_only_status() {
        let mut d = dashboard();
        let member = Membership {
            id: "m1".into(),
            name: "Lyra".into(),
            email: "lyra@example.com".into(),
            notes: Some("Owns a Dobsonian".into()),
            date: "2026-03-01".into(),
            ..Default::default()
        };
        d.store().save_membership(member.clone()).unwrap();
        d.reload();

        d.set_status(Collection::Memberships, "m1", ReviewStatus::Approved).unwrap();
        let saved = d.snapshot().memberships[0].clone();
        assert_eq!(saved.status, ReviewStatus::Approved);
        assert_eq!(Membership { status: ReviewStatus::Pending, ..saved }, member);

        d.set_status(Collection::Registrations, "r1", ReviewStatus::Rejected).unwrap();
        assert_eq!(d.snapshot().registrations[0].status, ReviewStatus::Rejected);
        assert_eq!(d.snapshot().registrations[0].name, "I. Jayasinghe");
    }

    #[test]
    fn test_status_on_other_tabs_or_missing_ids() {
        let mut d = dashboard();
        assert!(matches!(
            d.set_status(Collection::Events, "1", ReviewStatus::Approved),
            Err(DashboardError::Form(FormError::NotReviewable("Events")))
        ));
        assert!(matches!(
            d.set_status(Collection::Memberships, "nobody", ReviewStatus::Approved),
            Err(DashboardError::Store(StoreError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_search_filters_active_tab() {
        let mut d = dashboard();
        d.set_active(Collection::Gallery);
        d.set_search("ASTROPHOTOGRAPHY");
        assert_eq!(d.visible_records().len(), 3);
        d.set_search("");
        assert_eq!(d.visible_records().len(), 8);
    }

    #[test]
    fn test_stale_notice_timer_keeps_newer_notice() {
        let mut d = dashboard();
        let first = d.notify(NoticeKind::Success, "first");
        let second = d.notify(NoticeKind::Success, "second");
        d.clear_notice(first);
        assert_eq!(d.notice().map(|n| n.id), Some(second));
        d.clear_notice(second);
        assert!(d.notice().is_none());
    }

    #[test]
    fn test_reset_store_restores_defaults() {
        let mut d = dashboard();
        d.handle_delete(Collection::Team, "1", || true).unwrap();
        assert!(!d.reset_store(|| false));
        assert_eq!(d.count(Collection::Team), 5);
        assert!(d.reset_store(|| true));
        assert_eq!(d.count(Collection::Team), 6);
    }

    #[test]
    fn test_corrupt_storage_is_reported_on_open() {
        let storage = MemoryStorage::new();
        storage.set_item("dash_test", "not json").unwrap();
        let d = Dashboard::new(Store::new(storage, "dash_test"));
        assert_eq!(d.notice().map(|n| n.kind), Some(NoticeKind::Error));
        assert_eq!(d.count(Collection::Events), 5);
    }
}
