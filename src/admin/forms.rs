//! 管理画面フォームの定義
//!
//! タブごとの入力項目（`FieldSpec`）と、レコード ⇔ フォーム値の変換。
//! フォーム値はすべて文字列で持ち、保存時に型付きレコードへ戻す。

use std::collections::BTreeMap;

use crate::errors::FormError;
use crate::models::{
    Achievement, AnyRecord, Collection, Competition, Event, EventCategory, GalleryImage, NewsItem,
    Quiz, Record, TeamMember, TeamType,
};
use crate::utils::{non_empty, today};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    TextArea,
    Select(&'static [&'static str]),
    /// チェックボックス（値は "true" / "false"）
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, label, kind, required: false }
}

const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, label, kind, required: true }
}

const EVENT_CATEGORIES: &[&str] = &["workshop", "observation", "competition", "other"];
const TEAM_TYPES: &[&str] = &["committee", "faculty", "past"];

pub const EVENT_FIELDS: &[FieldSpec] = &[
    required("title", "Event Title", FieldKind::Text),
    field("date", "Date", FieldKind::Date),
    field("time", "Time", FieldKind::Text),
    field("location", "Location", FieldKind::Text),
    field("category", "Category", FieldKind::Select(EVENT_CATEGORIES)),
    field("description", "Description", FieldKind::TextArea),
    field("image", "Image URL", FieldKind::Text),
    field("featured", "Featured on home page", FieldKind::Toggle),
];

pub const NEWS_FIELDS: &[FieldSpec] = &[
    required("title", "News Title", FieldKind::Text),
    field("date", "Date", FieldKind::Date),
    field("category", "Category", FieldKind::Text),
    field("description", "Description", FieldKind::TextArea),
    field("image", "Image URL", FieldKind::Text),
];

pub const COMPETITION_FIELDS: &[FieldSpec] = &[
    required("title", "Competition Title", FieldKind::Text),
    field("deadline", "Deadline", FieldKind::Date),
    field("description", "Description", FieldKind::TextArea),
    field("categories", "Categories (comma separated)", FieldKind::Text),
    field("rulesLink", "Rules Link", FieldKind::Text),
    field("submissionLink", "Submission Link", FieldKind::Text),
];

pub const TEAM_FIELDS: &[FieldSpec] = &[
    required("name", "Name", FieldKind::Text),
    field("role", "Role", FieldKind::Text),
    field("type", "Type", FieldKind::Select(TEAM_TYPES)),
];

pub const ACHIEVEMENT_FIELDS: &[FieldSpec] = &[
    required("title", "Achievement Title", FieldKind::Text),
    field("year", "Year", FieldKind::Text),
    field("category", "Category", FieldKind::Text),
    field("description", "Description", FieldKind::TextArea),
];

pub const GALLERY_FIELDS: &[FieldSpec] = &[
    required("src", "Image URL", FieldKind::Text),
    field("alt", "Alt Text", FieldKind::Text),
    field("category", "Category", FieldKind::Text),
];

pub const QUIZ_FIELDS: &[FieldSpec] = &[
    required("title", "Quiz Title", FieldKind::Text),
    field("description", "Description", FieldKind::TextArea),
];

/// タブの入力項目。フォームを持たないタブは空
pub fn form_fields(collection: Collection) -> &'static [FieldSpec] {
    match collection {
        Collection::Events => EVENT_FIELDS,
        Collection::News => NEWS_FIELDS,
        Collection::Competitions => COMPETITION_FIELDS,
        Collection::Gallery => GALLERY_FIELDS,
        Collection::Team => TEAM_FIELDS,
        Collection::Achievements => ACHIEVEMENT_FIELDS,
        Collection::Quizzes => QUIZ_FIELDS,
        Collection::Registrations
        | Collection::Memberships
        | Collection::QuizAttempts
        | Collection::Messages => &[],
    }
}

// ============================================
// フォーム値
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未入力は空文字
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.get(name) == "true"
    }

    fn optional(&self, name: &str) -> Option<String> {
        non_empty(self.get(name))
    }

    fn text(&self, name: &str) -> String {
        self.get(name).trim().to_string()
    }

    fn check_required(&self, fields: &[FieldSpec]) -> Result<(), FormError> {
        match fields.iter().find(|f| f.required && self.get(f.name).trim().is_empty()) {
            Some(missing) => Err(FormError::MissingField(missing.label)),
            None => Ok(()),
        }
    }
}

/// "Lunar, Planetary,  Deep Sky" → ["Lunar", "Planetary", "Deep Sky"]
pub fn split_categories(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// 編集用の文字列に戻す
pub fn join_categories(categories: &[String]) -> String {
    categories.join(", ")
}

fn optional_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ============================================
// レコード ⇔ フォーム
// ============================================

/// フォームで編集できるレコード
///
/// `apply_form` は元のレコードに上書きするので、フォームにない項目
/// （featured, registrationLink, createdAt など）は保持される。
pub trait FormRecord: Record + Default {
    const FIELDS: &'static [FieldSpec];

    fn to_form(&self) -> FormValues;
    fn apply_form(&mut self, values: &FormValues);
}

impl FormRecord for Event {
    const FIELDS: &'static [FieldSpec] = EVENT_FIELDS;

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("title", &self.title)
            .with("date", &self.date)
            .with("time", &self.time)
            .with("location", &self.location)
            .with("category", self.category.as_str())
            .with("description", &self.description)
            .with("image", optional_text(&self.image))
            .with("featured", self.featured.to_string())
    }

    fn apply_form(&mut self, values: &FormValues) {
        self.title = values.text("title");
        self.date = values.text("date");
        self.time = values.text("time");
        self.location = values.text("location");
        self.category = EventCategory::parse(values.get("category")).unwrap_or_default();
        self.description = values.text("description");
        self.image = values.optional("image");
        self.featured = values.is_checked("featured");
    }
}

impl FormRecord for NewsItem {
    const FIELDS: &'static [FieldSpec] = NEWS_FIELDS;

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("title", &self.title)
            .with("date", &self.date)
            .with("category", &self.category)
            .with("description", &self.description)
            .with("image", optional_text(&self.image))
    }

    fn apply_form(&mut self, values: &FormValues) {
        self.title = values.text("title");
        self.date = values.text("date");
        self.category = values.text("category");
        self.description = values.text("description");
        self.image = values.optional("image");
    }
}

impl FormRecord for Competition {
    const FIELDS: &'static [FieldSpec] = COMPETITION_FIELDS;

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("title", &self.title)
            .with("deadline", &self.deadline)
            .with("description", &self.description)
            .with("categories", join_categories(&self.categories))
            .with("rulesLink", optional_text(&self.rules_link))
            .with("submissionLink", optional_text(&self.submission_link))
    }

    fn apply_form(&mut self, values: &FormValues) {
        self.title = values.text("title");
        self.deadline = values.text("deadline");
        self.description = values.text("description");
        self.categories = split_categories(values.get("categories"));
        self.rules_link = values.optional("rulesLink");
        self.submission_link = values.optional("submissionLink");
    }
}

impl FormRecord for GalleryImage {
    const FIELDS: &'static [FieldSpec] = GALLERY_FIELDS;

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("src", &self.src)
            .with("alt", &self.alt)
            .with("category", &self.category)
    }

    fn apply_form(&mut self, values: &FormValues) {
        self.src = values.text("src");
        self.alt = values.text("alt");
        self.category = values.text("category");
    }
}

impl FormRecord for TeamMember {
    const FIELDS: &'static [FieldSpec] = TEAM_FIELDS;

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("role", &self.role)
            .with("type", self.member_type.as_str())
    }

    fn apply_form(&mut self, values: &FormValues) {
        self.name = values.text("name");
        self.role = values.text("role");
        self.member_type = TeamType::parse(values.get("type")).unwrap_or_default();
    }
}

impl FormRecord for Achievement {
    const FIELDS: &'static [FieldSpec] = ACHIEVEMENT_FIELDS;

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("title", &self.title)
            .with("year", &self.year)
            .with("category", &self.category)
            .with("description", &self.description)
    }

    fn apply_form(&mut self, values: &FormValues) {
        self.title = values.text("title");
        self.year = values.text("year");
        self.category = values.text("category");
        self.description = values.text("description");
    }
}

/// 問題はクイズエディタ側で扱う
impl FormRecord for Quiz {
    const FIELDS: &'static [FieldSpec] = QUIZ_FIELDS;

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("title", &self.title)
            .with("description", &self.description)
    }

    fn apply_form(&mut self, values: &FormValues) {
        self.title = values.text("title");
        self.description = values.text("description");
        if self.created_at.is_empty() {
            self.created_at = today();
        }
    }
}

fn build<R: FormRecord>(base: Option<R>, values: &FormValues, id: &str) -> Result<R, FormError> {
    values.check_required(R::FIELDS)?;
    let mut record = base.unwrap_or_default();
    record.apply_form(values);
    record.set_id(id.to_string());
    Ok(record)
}

/// 編集対象のレコードをフォーム値に変換
pub fn record_to_form(record: &AnyRecord) -> FormValues {
    match record {
        AnyRecord::Event(r) => r.to_form(),
        AnyRecord::News(r) => r.to_form(),
        AnyRecord::Competition(r) => r.to_form(),
        AnyRecord::Gallery(r) => r.to_form(),
        AnyRecord::Team(r) => r.to_form(),
        AnyRecord::Achievement(r) => r.to_form(),
        AnyRecord::Quiz(r) => r.to_form(),
        AnyRecord::Message(_)
        | AnyRecord::Registration(_)
        | AnyRecord::QuizAttempt(_)
        | AnyRecord::Membership(_) => FormValues::new(),
    }
}

/// フォーム値からレコードを組み立てる。`base` は編集中の元レコード
pub fn build_record(
    collection: Collection,
    base: Option<&AnyRecord>,
    values: &FormValues,
    id: &str,
) -> Result<AnyRecord, FormError> {
    let record = match collection {
        Collection::Events => AnyRecord::Event(build(
            match base {
                Some(AnyRecord::Event(r)) => Some(r.clone()),
                _ => None,
            },
            values,
            id,
        )?),
        Collection::News => AnyRecord::News(build(
            match base {
                Some(AnyRecord::News(r)) => Some(r.clone()),
                _ => None,
            },
            values,
            id,
        )?),
        Collection::Competitions => AnyRecord::Competition(build(
            match base {
                Some(AnyRecord::Competition(r)) => Some(r.clone()),
                _ => None,
            },
            values,
            id,
        )?),
        Collection::Gallery => AnyRecord::Gallery(build(
            match base {
                Some(AnyRecord::Gallery(r)) => Some(r.clone()),
                _ => None,
            },
            values,
            id,
        )?),
        Collection::Team => AnyRecord::Team(build(
            match base {
                Some(AnyRecord::Team(r)) => Some(r.clone()),
                _ => None,
            },
            values,
            id,
        )?),
        Collection::Achievements => AnyRecord::Achievement(build(
            match base {
                Some(AnyRecord::Achievement(r)) => Some(r.clone()),
                _ => None,
            },
            values,
            id,
        )?),
        Collection::Quizzes => AnyRecord::Quiz(build(
            match base {
                Some(AnyRecord::Quiz(r)) => Some(r.clone()),
                _ => None,
            },
            values,
            id,
        )?),
        Collection::Registrations
        | Collection::Memberships
        | Collection::QuizAttempts
        | Collection::Messages => return Err(FormError::NotEditable(collection.label())),
    };
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_categories_trims_and_drops_empty() {
        assert_eq!(
            split_categories("Lunar, Planetary,  Deep Sky"),
            vec!["Lunar", "Planetary", "Deep Sky"]
        );
        assert_eq!(split_categories(" , ,Creative,"), vec!["Creative"]);
        assert!(split_categories("").is_empty());
    }

    #[test]
    fn test_competition_categories_round_trip_through_form() {
        let values = FormValues::new()
            .with("title", "Astrophotography Contest")
            .with("categories", "Lunar, Planetary,  Deep Sky");
        let record = build_record(Collection::Competitions, None, &values, "c1").unwrap();
        let AnyRecord::Competition(comp) = &record else {
            panic!("expected competition");
        };
        assert_eq!(comp.categories, vec!["Lunar", "Planetary", "Deep Sky"]);
        assert_eq!(comp.id, "c1");

        let form = record_to_form(&record);
        assert_eq!(form.get("categories"), "Lunar, Planetary, Deep Sky");
    }

    #[test]
    fn test_edit_keeps_fields_outside_the_form() {
        let base = AnyRecord::Event(Event {
            id: "1".into(),
            title: "Old".into(),
            registration_link: Some("#register".into()),
            category: EventCategory::Observation,
            ..Default::default()
        });
        let mut values = record_to_form(&base);
        values.set("title", "Messier Marathon");
        let AnyRecord::Event(event) = build_record(Collection::Events, Some(&base), &values, "1").unwrap() else {
            panic!("expected event");
        };
        assert_eq!(event.title, "Messier Marathon");
        assert_eq!(event.registration_link.as_deref(), Some("#register"));
        assert_eq!(event.category, EventCategory::Observation);
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let values = FormValues::new().with("title", "Telescope").with("image", "   ");
        let AnyRecord::News(news) = build_record(Collection::News, None, &values, "n1").unwrap() else {
            panic!("expected news");
        };
        assert!(news.image.is_none());
    }

    #[test]
    fn test_select_fields_parse_enums() {
        let values = FormValues::new().with("name", "R. Wijesinghe").with("type", "faculty");
        let AnyRecord::Team(member) = build_record(Collection::Team, None, &values, "t1").unwrap() else {
            panic!("expected team member");
        };
        assert_eq!(member.member_type, TeamType::Faculty);
    }

    #[test]
    fn test_required_field_missing() {
        let values = FormValues::new().with("alt", "Moon");
        assert_eq!(
            build_record(Collection::Gallery, None, &values, "g1"),
            Err(FormError::MissingField("Image URL"))
        );
    }

    #[test]
    fn test_non_form_collections_are_rejected() {
        let values = FormValues::new();
        assert_eq!(
            build_record(Collection::Messages, None, &values, "m1"),
            Err(FormError::NotEditable("Messages"))
        );
        assert!(form_fields(Collection::Registrations).is_empty());
    }

    #[test]
    fn test_every_editable_tab_has_fields() {
        for collection in Collection::ALL {
            assert_eq!(collection.is_form_editable(), !form_fields(collection).is_empty());
        }
    }

    #[test]
    fn test_new_quiz_gets_created_at() {
        let values = FormValues::new().with("title", "Planets");
        let AnyRecord::Quiz(quiz) = build_record(Collection::Quizzes, None, &values, "z1").unwrap() else {
            panic!("expected quiz");
        };
        assert_eq!(quiz.created_at, today());

        let base = AnyRecord::Quiz(Quiz { created_at: "2026-02-20".into(), ..Default::default() });
        let AnyRecord::Quiz(edited) = build_record(Collection::Quizzes, Some(&base), &values, "z1").unwrap() else {
            panic!("expected quiz");
        };
        assert_eq!(edited.created_at, "2026-02-20");
    }
}
