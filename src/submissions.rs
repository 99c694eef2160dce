//! 公開ページのフォーム送信
//!
//! 問い合わせ・大会/イベント申込・入会申請。どれも名前とメールが必須で、
//! 日付は送信日、申込と入会は審査待ち（pending）で保存する。

use serde_json::json;

use crate::errors::SubmitError;
use crate::models::{Competition, ContactMessage, Event, Membership, Registration, ReviewStatus, SourceType};
use crate::store::{KeyValueStorage, Store};
use crate::utils::log_trace::log_info_with_data;
use crate::utils::{new_record_id, non_empty, today};

/// 名前とメールを検証して、空白を除いた値を返す
fn contact_fields(name: &str, email: &str) -> Result<(String, String), SubmitError> {
    match (non_empty(name), non_empty(email)) {
        (Some(name), Some(email)) => Ok((name, email)),
        _ => Err(SubmitError::MissingContact),
    }
}

// ============================================
// 問い合わせ
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub fn submit_contact<S: KeyValueStorage>(store: &Store<S>, form: &ContactForm) -> Result<ContactMessage, SubmitError> {
    let (name, email) = contact_fields(&form.name, &form.email)?;
    let message = non_empty(&form.message).ok_or(SubmitError::EmptyMessage)?;

    let record = ContactMessage { id: new_record_id(), name, email, message, date: today() };
    store.save_message(record.clone())?;
    log_info_with_data("public", "contact message received", json!({ "id": record.id }));
    Ok(record)
}

// ============================================
// 大会・イベント申込
// ============================================

/// どのページから申込フォームを開いたか
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationContext {
    pub source_type: SourceType,
    pub source_id: String,
    pub source_title: String,
}

impl RegistrationContext {
    pub fn for_competition(competition: Option<&Competition>) -> Self {
        Self {
            source_type: SourceType::Competition,
            source_id: competition.map(|c| c.id.clone()).unwrap_or_default(),
            source_title: competition
                .and_then(|c| non_empty(&c.title))
                .unwrap_or_else(|| "Competition".to_string()),
        }
    }

    pub fn for_event(event: &Event) -> Self {
        Self {
            source_type: SourceType::Event,
            source_id: event.id.clone(),
            source_title: non_empty(&event.title).unwrap_or_else(|| "Event".to_string()),
        }
    }

    /// カテゴリの選択肢。大会なら選んだ大会のカテゴリ、イベントは "General" のみ
    pub fn category_options(&self, competitions: &[Competition], selected: &str) -> Vec<String> {
        match self.source_type {
            SourceType::Competition => competitions
                .iter()
                .find(|c| c.id == selected)
                .map(|c| c.categories.clone())
                .unwrap_or_default(),
            SourceType::Event => vec!["General".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// 大会の選択欄（イベント申込では空）
    pub competition_id: String,
    pub category: String,
    pub notes: String,
}

/// competitionId: 選んだ大会 → 先頭の大会 → 申込元のID → "unknown"
pub fn resolve_competition_id(chosen: &str, competitions: &[Competition], context: &RegistrationContext) -> String {
    non_empty(chosen)
        .or_else(|| competitions.first().and_then(|c| non_empty(&c.id)))
        .or_else(|| non_empty(&context.source_id))
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn submit_registration<S: KeyValueStorage>(
    store: &Store<S>,
    context: &RegistrationContext,
    form: &RegistrationForm,
) -> Result<Registration, SubmitError> {
    let (name, email) = contact_fields(&form.name, &form.email)?;
    let competitions = store.get_competitions();
    if context.source_type == SourceType::Competition && competitions.is_empty() {
        return Err(SubmitError::NoCompetitions);
    }

    let record = Registration {
        id: new_record_id(),
        name,
        email,
        phone: non_empty(&form.phone),
        competition_id: resolve_competition_id(&form.competition_id, &competitions, context),
        category: non_empty(&form.category),
        source_type: Some(context.source_type),
        source_id: Some(context.source_id.clone()),
        source_title: Some(context.source_title.clone()),
        status: ReviewStatus::Pending,
        notes: non_empty(&form.notes),
        date: today(),
    };
    store.save_registration(record.clone())?;
    log_info_with_data(
        "public",
        "registration received",
        json!({ "id": record.id, "sourceType": context.source_type.as_str(), "competitionId": record.competition_id }),
    );
    Ok(record)
}

// ============================================
// 入会申請
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub grade: String,
    pub interest: String,
    pub notes: String,
}

pub fn submit_membership<S: KeyValueStorage>(store: &Store<S>, form: &MembershipForm) -> Result<Membership, SubmitError> {
    let (name, email) = contact_fields(&form.name, &form.email)?;
    let record = Membership {
        id: new_record_id(),
        name,
        email,
        phone: non_empty(&form.phone),
        grade: non_empty(&form.grade),
        interest: non_empty(&form.interest),
        notes: non_empty(&form.notes),
        status: ReviewStatus::Pending,
        date: today(),
    };
    store.save_membership(record.clone())?;
    log_info_with_data("public", "membership request received", json!({ "id": record.id }));
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    fn store() -> Store<MemoryStorage> {
        Store::new(MemoryStorage::new(), "submit_test")
    }

    fn competition(id: &str) -> Competition {
        Competition {
            id: id.into(),
            title: format!("Contest {}", id),
            categories: vec!["Lunar".into(), "Deep Sky".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_contact_requires_name_and_email() {
        let store = store();
        let form = ContactForm { name: "Altair".into(), email: " ".into(), message: "Hi".into() };
        assert!(matches!(submit_contact(&store, &form), Err(SubmitError::MissingContact)));
        assert!(store.get_messages().is_empty());
    }

    #[test]
    fn test_contact_is_saved_with_today() {
        let store = store();
        let form = ContactForm { name: "Altair".into(), email: "altair@example.com".into(), message: " Star party? ".into() };
        let saved = submit_contact(&store, &form).unwrap();
        assert_eq!(saved.message, "Star party?");
        assert_eq!(saved.date, today());
        assert_eq!(store.get_messages(), vec![saved]);
    }

    #[test]
    fn test_competition_id_fallback_chain() {
        let comps = vec![competition("c1"), competition("c2")];
        let ctx = RegistrationContext::for_event(&Event { id: "e9".into(), title: "Star Camp".into(), ..Default::default() });

        assert_eq!(resolve_competition_id("c2", &comps, &ctx), "c2");
        assert_eq!(resolve_competition_id("", &comps, &ctx), "c1");
        assert_eq!(resolve_competition_id("", &[], &ctx), "e9");
        let orphan = RegistrationContext::for_competition(None);
        assert_eq!(orphan.source_title, "Competition");
        assert_eq!(resolve_competition_id("", &[], &orphan), "unknown");
    }

    #[test]
    fn test_event_registration_keeps_source_context() {
        let store = store();
        let event = Event { id: "2".into(), title: "Messier Marathon".into(), ..Default::default() };
        let ctx = RegistrationContext::for_event(&event);
        let form = RegistrationForm {
            name: "Deneb".into(),
            email: "deneb@example.com".into(),
            category: "General".into(),
            ..Default::default()
        };
        let saved = submit_registration(&store, &ctx, &form).unwrap();

        assert_eq!(saved.status, ReviewStatus::Pending);
        assert_eq!(saved.request_type(), SourceType::Event);
        assert_eq!(saved.source_title.as_deref(), Some("Messier Marathon"));
        assert_eq!(saved.competition_id, "1");
        assert!(saved.phone.is_none());
        assert_eq!(store.get_registrations().len(), 2);
    }

    #[test]
    fn test_competition_registration_needs_a_competition() {
        let store = store();
        store.delete_competition("1").unwrap();
        let ctx = RegistrationContext::for_competition(None);
        let form = RegistrationForm { name: "Deneb".into(), email: "deneb@example.com".into(), ..Default::default() };
        assert!(matches!(submit_registration(&store, &ctx, &form), Err(SubmitError::NoCompetitions)));
    }

    #[test]
    fn test_category_options() {
        let comps = vec![competition("c1")];
        let ctx = RegistrationContext::for_competition(comps.first());
        assert_eq!(ctx.category_options(&comps, "c1"), vec!["Lunar", "Deep Sky"]);
        assert!(ctx.category_options(&comps, "zz").is_empty());
        let event_ctx = RegistrationContext::for_event(&Event::default());
        assert_eq!(event_ctx.source_title, "Event");
        assert_eq!(event_ctx.category_options(&comps, ""), vec!["General"]);
    }

    #[test]
    fn test_membership_is_pending() {
        let store = store();
        let form = MembershipForm {
            name: "Sirius".into(),
            email: "sirius@example.com".into(),
            grade: "Grade 11".into(),
            ..Default::default()
        };
        let saved = submit_membership(&store, &form).unwrap();
        assert_eq!(saved.status, ReviewStatus::Pending);
        assert_eq!(saved.grade.as_deref(), Some("Grade 11"));
        assert!(saved.interest.is_none());
        assert_eq!(store.get_memberships().len(), 1);
    }
}
