//! データ構造体モジュール
//!
//! localStorage に保存される1つのJSONドキュメント（`SiteData`）と、
//! その中の各コレクションのレコード型。キー名は保存済みデータとの互換のため camelCase。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================
// 公開コンテンツ
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    #[default]
    Workshop,
    Observation,
    Competition,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::Workshop,
        EventCategory::Observation,
        EventCategory::Competition,
        EventCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Workshop => "workshop",
            EventCategory::Observation => "observation",
            EventCategory::Competition => "competition",
            EventCategory::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub category: EventCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// トップに大きく表示するイベント
    #[serde(skip_serializing_if = "is_false")]
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
}

impl Event {
    /// イベントが1件もないときにトップへ出す仮のイベント
    pub fn placeholder() -> Self {
        Event {
            id: "fallback".to_string(),
            title: "New Event Coming Soon".to_string(),
            date: "TBA".to_string(),
            time: "TBA".to_string(),
            location: "TBA".to_string(),
            description: "Admins can add the next featured event from the dashboard.".to_string(),
            category: EventCategory::Other,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub title: String,
    pub deadline: String,
    pub description: String,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamType {
    #[default]
    Committee,
    Faculty,
    Past,
}

impl TeamType {
    pub const ALL: [TeamType; 3] = [TeamType::Committee, TeamType::Faculty, TeamType::Past];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamType::Committee => "committee",
            TeamType::Faculty => "faculty",
            TeamType::Past => "past",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub member_type: TeamType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub year: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// 会誌（管理画面では未使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Magazine {
    pub id: String,
    pub title: String,
    pub issue: String,
    pub date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
}

/// 学習リソース（管理画面では未使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

// ============================================
// 公開フォームからの受付
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub date: String,
}

/// 申込・入会の審査状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

/// 申込の元になったページ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Competition,
    Event,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Competition => "competition",
            SourceType::Event => "event",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub competition_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: String,
}

impl Registration {
    /// 一覧に出す申込先の名前: sourceTitle → 大会名 → "N/A"
    pub fn display_title(&self, competitions: &[Competition]) -> String {
        if let Some(title) = self.source_title.as_ref().filter(|t| !t.is_empty()) {
            return title.clone();
        }
        competitions
            .iter()
            .find(|c| c.id == self.competition_id)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn request_type(&self) -> SourceType {
        self.source_type.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: ReviewStatus,
    pub date: String,
}

// ============================================
// クイズ
// ============================================

/// 1問あたりの選択肢数
pub const QUIZ_OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub questions: Vec<QuizQuestion>,
}

/// 解答1問分の記録。未回答は `selected = -1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AttemptAnswer {
    pub question_id: String,
    pub selected: i64,
    pub correct: usize,
}

impl AttemptAnswer {
    pub const UNANSWERED: i64 = -1;

    pub fn is_correct(&self) -> bool {
        usize::try_from(self.selected).map_or(false, |s| s == self.correct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub name: String,
    pub email: String,
    pub score: usize,
    /// 提出時点の問題数（後でクイズを編集しても変わらない）
    pub total: usize,
    pub date: String,
    pub answers: Vec<AttemptAnswer>,
}

// ============================================
// ドキュメント全体
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SiteData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub news: Vec<NewsItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub competitions: Vec<Competition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gallery: Vec<GalleryImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: Vec<TeamMember>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub magazines: Vec<Magazine>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: Vec<Achievement>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<Resource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<ContactMessage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub registrations: Vec<Registration>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quizzes: Vec<Quiz>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quiz_attempts: Vec<QuizAttempt>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memberships: Vec<Membership>,
}

impl SiteData {
    /// トップに出すイベント: featured の先頭、なければ先頭のイベント
    pub fn featured_event(&self) -> Option<&Event> {
        self.events.iter().find(|e| e.featured).or_else(|| self.events.first())
    }

    /// featured 以外のイベントを最大4件
    pub fn upcoming_events(&self) -> Vec<&Event> {
        self.events.iter().filter(|e| !e.featured).take(4).collect()
    }

    /// 管理画面の1タブ分のレコード
    pub fn records(&self, collection: Collection) -> Vec<AnyRecord> {
        match collection {
            Collection::Events => self.events.iter().cloned().map(AnyRecord::Event).collect(),
            Collection::News => self.news.iter().cloned().map(AnyRecord::News).collect(),
            Collection::Competitions => self.competitions.iter().cloned().map(AnyRecord::Competition).collect(),
            Collection::Gallery => self.gallery.iter().cloned().map(AnyRecord::Gallery).collect(),
            Collection::Team => self.team.iter().cloned().map(AnyRecord::Team).collect(),
            Collection::Achievements => self.achievements.iter().cloned().map(AnyRecord::Achievement).collect(),
            Collection::Messages => self.messages.iter().cloned().map(AnyRecord::Message).collect(),
            Collection::Registrations => self.registrations.iter().cloned().map(AnyRecord::Registration).collect(),
            Collection::Quizzes => self.quizzes.iter().cloned().map(AnyRecord::Quiz).collect(),
            Collection::QuizAttempts => self.quiz_attempts.iter().cloned().map(AnyRecord::QuizAttempt).collect(),
            Collection::Memberships => self.memberships.iter().cloned().map(AnyRecord::Membership).collect(),
        }
    }

    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Events => self.events.len(),
            Collection::News => self.news.len(),
            Collection::Competitions => self.competitions.len(),
            Collection::Gallery => self.gallery.len(),
            Collection::Team => self.team.len(),
            Collection::Achievements => self.achievements.len(),
            Collection::Messages => self.messages.len(),
            Collection::Registrations => self.registrations.len(),
            Collection::Quizzes => self.quizzes.len(),
            Collection::QuizAttempts => self.quiz_attempts.len(),
            Collection::Memberships => self.memberships.len(),
        }
    }

    pub fn quiz(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == id)
    }
}

/// `null` を空のコレクションとして読む
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================
// レコード共通トレイト
// ============================================

/// ドキュメント内の1コレクションに属するレコード
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// ドキュメント上のキー（"events" など）
    const KEY: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn items_mut(data: &mut SiteData) -> &mut Vec<Self>;
}

macro_rules! impl_record {
    ($ty:ty, $key:literal, $field:ident) => {
        impl Record for $ty {
            const KEY: &'static str = $key;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn items_mut(data: &mut SiteData) -> &mut Vec<Self> {
                &mut data.$field
            }
        }
    };
}

impl_record!(Event, "events", events);
impl_record!(NewsItem, "news", news);
impl_record!(Competition, "competitions", competitions);
impl_record!(GalleryImage, "gallery", gallery);
impl_record!(TeamMember, "team", team);
impl_record!(Magazine, "magazines", magazines);
impl_record!(Achievement, "achievements", achievements);
impl_record!(Resource, "resources", resources);
impl_record!(ContactMessage, "messages", messages);
impl_record!(Registration, "registrations", registrations);
impl_record!(Quiz, "quizzes", quizzes);
impl_record!(QuizAttempt, "quizAttempts", quiz_attempts);
impl_record!(Membership, "memberships", memberships);

// ============================================
// 管理画面のタブ
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collection {
    #[default]
    Events,
    News,
    Competitions,
    Gallery,
    Team,
    Achievements,
    Registrations,
    Memberships,
    Quizzes,
    QuizAttempts,
    Messages,
}

impl Collection {
    /// タブの表示順
    pub const ALL: [Collection; 11] = [
        Collection::Events,
        Collection::News,
        Collection::Competitions,
        Collection::Gallery,
        Collection::Team,
        Collection::Achievements,
        Collection::Registrations,
        Collection::Memberships,
        Collection::Quizzes,
        Collection::QuizAttempts,
        Collection::Messages,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Collection::Events => Event::KEY,
            Collection::News => NewsItem::KEY,
            Collection::Competitions => Competition::KEY,
            Collection::Gallery => GalleryImage::KEY,
            Collection::Team => TeamMember::KEY,
            Collection::Achievements => Achievement::KEY,
            Collection::Registrations => Registration::KEY,
            Collection::Memberships => Membership::KEY,
            Collection::Quizzes => Quiz::KEY,
            Collection::QuizAttempts => QuizAttempt::KEY,
            Collection::Messages => ContactMessage::KEY,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Collection::Events => "Events",
            Collection::News => "News",
            Collection::Competitions => "Competitions",
            Collection::Gallery => "Gallery",
            Collection::Team => "Team",
            Collection::Achievements => "Achievements",
            Collection::Registrations => "Registrations",
            Collection::Memberships => "Memberships",
            Collection::Quizzes => "Quizzes",
            Collection::QuizAttempts => "Quiz Results",
            Collection::Messages => "Messages",
        }
    }

    /// 追加・編集フォームを持つタブ
    pub fn is_form_editable(&self) -> bool {
        !matches!(
            self,
            Collection::Registrations
                | Collection::Memberships
                | Collection::QuizAttempts
                | Collection::Messages
        )
    }

    /// 承認/却下ボタンを持つタブ
    pub fn is_reviewable(&self) -> bool {
        matches!(self, Collection::Registrations | Collection::Memberships)
    }
}

/// 任意のコレクションのレコード（タブごとのタグ付き列挙）
#[derive(Debug, Clone, PartialEq)]
pub enum AnyRecord {
    Event(Event),
    News(NewsItem),
    Competition(Competition),
    Gallery(GalleryImage),
    Team(TeamMember),
    Achievement(Achievement),
    Message(ContactMessage),
    Registration(Registration),
    Quiz(Quiz),
    QuizAttempt(QuizAttempt),
    Membership(Membership),
}

impl AnyRecord {
    pub fn collection(&self) -> Collection {
        match self {
            AnyRecord::Event(_) => Collection::Events,
            AnyRecord::News(_) => Collection::News,
            AnyRecord::Competition(_) => Collection::Competitions,
            AnyRecord::Gallery(_) => Collection::Gallery,
            AnyRecord::Team(_) => Collection::Team,
            AnyRecord::Achievement(_) => Collection::Achievements,
            AnyRecord::Message(_) => Collection::Messages,
            AnyRecord::Registration(_) => Collection::Registrations,
            AnyRecord::Quiz(_) => Collection::Quizzes,
            AnyRecord::QuizAttempt(_) => Collection::QuizAttempts,
            AnyRecord::Membership(_) => Collection::Memberships,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            AnyRecord::Event(r) => &r.id,
            AnyRecord::News(r) => &r.id,
            AnyRecord::Competition(r) => &r.id,
            AnyRecord::Gallery(r) => &r.id,
            AnyRecord::Team(r) => &r.id,
            AnyRecord::Achievement(r) => &r.id,
            AnyRecord::Message(r) => &r.id,
            AnyRecord::Registration(r) => &r.id,
            AnyRecord::Quiz(r) => &r.id,
            AnyRecord::QuizAttempt(r) => &r.id,
            AnyRecord::Membership(r) => &r.id,
        }
    }

    /// 検索用のJSON文字列表現
    pub fn to_json_text(&self) -> String {
        let json = match self {
            AnyRecord::Event(r) => serde_json::to_string(r),
            AnyRecord::News(r) => serde_json::to_string(r),
            AnyRecord::Competition(r) => serde_json::to_string(r),
            AnyRecord::Gallery(r) => serde_json::to_string(r),
            AnyRecord::Team(r) => serde_json::to_string(r),
            AnyRecord::Achievement(r) => serde_json::to_string(r),
            AnyRecord::Message(r) => serde_json::to_string(r),
            AnyRecord::Registration(r) => serde_json::to_string(r),
            AnyRecord::Quiz(r) => serde_json::to_string(r),
            AnyRecord::QuizAttempt(r) => serde_json::to_string(r),
            AnyRecord::Membership(r) => serde_json::to_string(r),
        };
        json.unwrap_or_default()
    }

    /// 大文字小文字を区別しない部分一致
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        term.is_empty() || self.to_json_text().to_lowercase().contains(&term)
    }

    /// 汎用テーブルの1行分（詳細・カテゴリ・日付）
    pub fn summary(&self) -> RecordSummary {
        let row = |title: &str, subtitle: &str, category: &str, date: &str| RecordSummary {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            category: category.to_string(),
            date: if date.is_empty() { "-".to_string() } else { date.to_string() },
            featured: false,
        };
        match self {
            AnyRecord::Event(r) => RecordSummary {
                featured: r.featured,
                ..row(&r.title, &r.description, r.category.as_str(), &r.date)
            },
            AnyRecord::News(r) => row(&r.title, &r.description, &r.category, &r.date),
            AnyRecord::Competition(r) => row(&r.title, &r.description, &r.categories.join(", "), &r.deadline),
            AnyRecord::Gallery(r) => row(&r.alt, &r.src, &r.category, ""),
            AnyRecord::Team(r) => row(&r.name, &r.role, r.member_type.as_str(), ""),
            AnyRecord::Achievement(r) => row(&r.title, &r.description, &r.category, &r.year),
            AnyRecord::Message(r) => row(&r.name, &r.message, &r.email, &r.date),
            AnyRecord::Registration(r) => row(&r.name, r.notes.as_deref().unwrap_or_default(), r.status.as_str(), &r.date),
            AnyRecord::Quiz(r) => row(&r.title, &r.description, &format!("{} questions", r.questions.len()), &r.created_at),
            AnyRecord::QuizAttempt(r) => row(&r.name, &r.email, &format!("{}/{}", r.score, r.total), &r.date),
            AnyRecord::Membership(r) => row(&r.name, &r.email, r.status.as_str(), &r.date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub date: String,
    pub featured: bool,
}
