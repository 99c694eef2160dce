//! 管理画面のロジック（UIから独立）

pub mod dashboard;
pub mod forms;
pub mod quiz_draft;

pub use dashboard::{Dashboard, Notice, NoticeKind};
pub use forms::{form_fields, FieldKind, FieldSpec};
pub use quiz_draft::{QuestionDraft, QuizDraft};

/// ブラウザのストアに繋いだダッシュボード
pub type SiteDashboard = Dashboard<crate::store::BrowserStorage>;
