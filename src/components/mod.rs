//! UIコンポーネントモジュール

pub mod login_modal;
pub mod notice_toast;
pub mod quiz_editor;
pub mod quiz_runner;
pub mod record_form;
pub mod signup_forms;

pub use login_modal::LoginModal;
pub use notice_toast::NoticeToast;
pub use quiz_editor::QuizEditor;
pub use quiz_runner::QuizRunner;
pub use record_form::RecordFormModal;
pub use signup_forms::{ContactSection, MembershipModal, RegistrationModal};
