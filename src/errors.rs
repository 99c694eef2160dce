//! エラー型モジュール
//!
//! ストア・フォーム・クイズ採点の各層のエラーをまとめる。
//! UI層ではすべて通知メッセージとして表示する（`Display`がそのまま文言になる）。

use thiserror::Error;

/// ストア（永続化層）のエラー
#[derive(Debug, Error)]
pub enum StoreError {
    /// 保存されている文字列がJSONとして読めない
    #[error("stored document is not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// JSONだがトップレベルがオブジェクトではない
    #[error("stored document is not a JSON object")]
    NotAnObject,

    /// コレクションの中身が型に合わない（そのコレクションだけ既定データになる）
    #[error("stored {collection} have an unexpected shape: {source}")]
    Decode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize document: {0}")]
    Encode(#[source] serde_json::Error),

    /// ストレージは使えるが書き込みを拒否された（容量超過など）
    #[error("storage rejected the write: {0}")]
    Write(String),

    /// 追記専用コレクションへの重複ID
    #[error("{collection} already contains a record with id {id}")]
    DuplicateId { collection: &'static str, id: String },

    #[error("{collection} has no record with id {id}")]
    NotFound { collection: &'static str, id: String },
}

/// 管理画面フォームの検証エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Add at least one complete question with 4 options.")]
    NoCompleteQuestion,

    #[error("Correct answer must be one of the {options} options (got {index}).")]
    InvalidCorrectIndex { index: usize, options: usize },

    #[error("{0} cannot be added or edited from the dashboard.")]
    NotEditable(&'static str),

    #[error("{0} has no approval workflow.")]
    NotReviewable(&'static str),

    #[error("Please fill in {0}.")]
    MissingField(&'static str),

    #[error("No form is open.")]
    NoOpenForm,
}

/// クイズ提出・採点のエラー
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Please add your name and email.")]
    MissingParticipant,

    #[error("Quiz {0} no longer exists.")]
    QuizNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 公開フォーム（問い合わせ・申込・入会）のエラー
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please add your name and email.")]
    MissingContact,

    #[error("Please write a message.")]
    EmptyMessage,

    #[error("No competitions are open for registration.")]
    NoCompetitions,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// ダッシュボード操作のエラー（フォーム検証 + ストア）
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
