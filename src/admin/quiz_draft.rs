//! クイズ編集中の問題リスト
//!
//! 行は常に1つ以上残る。保存時に未完成の行（問題文か選択肢が空）は捨てる。

use crate::errors::FormError;
use crate::models::{QuizQuestion, QUIZ_OPTION_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuestionDraft {
    fn blank(id: String) -> Self {
        Self {
            id,
            question: String::new(),
            options: vec![String::new(); QUIZ_OPTION_COUNT],
            correct_index: 0,
        }
    }

    /// 空白を除いた問題文と選択肢がすべて埋まっていれば完成
    fn finished(&self) -> Option<QuizQuestion> {
        let question = self.question.trim().to_string();
        let options: Vec<String> = self.options.iter().map(|o| o.trim().to_string()).collect();
        if question.is_empty() || options.iter().any(String::is_empty) {
            return None;
        }
        Some(QuizQuestion {
            id: self.id.clone(),
            question,
            options,
            correct_index: self.correct_index,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    questions: Vec<QuestionDraft>,
    next_seq: u32,
}

impl Default for QuizDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizDraft {
    /// 空の問題1行
    pub fn new() -> Self {
        let mut draft = Self { questions: Vec::new(), next_seq: 0 };
        draft.add_question();
        draft
    }

    /// 保存済みの問題から編集を始める。選択肢は4つに揃える
    pub fn from_questions(questions: &[QuizQuestion]) -> Self {
        if questions.is_empty() {
            return Self::new();
        }
        let questions = questions
            .iter()
            .map(|q| {
                let mut options = q.options.clone();
                options.resize(QUIZ_OPTION_COUNT, String::new());
                QuestionDraft {
                    id: q.id.clone(),
                    question: q.question.clone(),
                    options,
                    correct_index: q.correct_index,
                }
            })
            .collect();
        Self { questions, next_seq: 0 }
    }

    pub fn questions(&self) -> &[QuestionDraft] {
        &self.questions
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn set_question_text(&mut self, index: usize, value: &str) {
        if let Some(q) = self.questions.get_mut(index) {
            q.question = value.to_string();
        }
    }

    pub fn set_option_text(&mut self, index: usize, option: usize, value: &str) {
        if let Some(slot) = self.questions.get_mut(index).and_then(|q| q.options.get_mut(option)) {
            *slot = value.to_string();
        }
    }

    pub fn mark_correct(&mut self, index: usize, option: usize) -> Result<(), FormError> {
        if option >= QUIZ_OPTION_COUNT {
            return Err(FormError::InvalidCorrectIndex { index: option, options: QUIZ_OPTION_COUNT });
        }
        if let Some(q) = self.questions.get_mut(index) {
            q.correct_index = option;
        }
        Ok(())
    }

    pub fn add_question(&mut self) {
        self.next_seq += 1;
        let id = format!("q-{}-{}", chrono::Utc::now().timestamp_millis(), self.next_seq);
        self.questions.push(QuestionDraft::blank(id));
    }

    /// 最後の1行は消さない
    pub fn remove_question(&mut self, index: usize) -> bool {
        if self.questions.len() <= 1 || index >= self.questions.len() {
            return false;
        }
        self.questions.remove(index);
        true
    }

    /// 完成した問題だけを返す。1問もなければエラー
    pub fn finalize(&self) -> Result<Vec<QuizQuestion>, FormError> {
        let finished: Vec<QuizQuestion> = self.questions.iter().filter_map(QuestionDraft::finished).collect();
        if finished.is_empty() {
            return Err(FormError::NoCompleteQuestion);
        }
        if let Some(bad) = finished.iter().find(|q| q.correct_index >= q.options.len()) {
            return Err(FormError::InvalidCorrectIndex {
                index: bad.correct_index,
                options: bad.options.len(),
            });
        }
        Ok(finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(draft: &mut QuizDraft, index: usize, question: &str, options: [&str; 4]) {
        draft.set_question_text(index, question);
        for (i, opt) in options.iter().enumerate() {
            draft.set_option_text(index, i, opt);
        }
    }

    #[test]
    fn test_new_draft_has_one_blank_row() {
        let draft = QuizDraft::new();
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.questions()[0].options, vec![""; 4]);
        assert_eq!(draft.questions()[0].correct_index, 0);
    }

    #[test]
    fn test_all_incomplete_is_rejected() {
        let mut draft = QuizDraft::new();
        fill(&mut draft, 0, "Which planet is red?", ["Mars", "Venus", "", "Earth"]);
        draft.add_question();
        fill(&mut draft, 1, "   ", ["a", "b", "c", "d"]);
        assert_eq!(draft.finalize(), Err(FormError::NoCompleteQuestion));
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let mut draft = QuizDraft::new();
        fill(&mut draft, 0, " Which planet is red? ", ["Mars ", "Venus", "Jupiter", "Earth"]);
        draft.add_question();
        fill(&mut draft, 1, "Half written", ["a", "", "", ""]);
        draft.mark_correct(0, 0).unwrap();

        let questions = draft.finalize().unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Which planet is red?");
        assert_eq!(questions[0].options[0], "Mars");
        assert_eq!(questions[0].correct_index, 0);
    }

    #[test]
    fn test_last_row_cannot_be_removed() {
        let mut draft = QuizDraft::new();
        assert!(!draft.remove_question(0));
        draft.add_question();
        assert!(draft.remove_question(0));
        assert_eq!(draft.len(), 1);
    }

    #[test]
    fn test_added_rows_have_distinct_ids() {
        let mut draft = QuizDraft::new();
        draft.add_question();
        draft.add_question();
        let ids: std::collections::HashSet<&str> = draft.questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_mark_correct_out_of_range() {
        let mut draft = QuizDraft::new();
        assert!(draft.mark_correct(0, 4).is_err());
        draft.mark_correct(0, 3).unwrap();
        assert_eq!(draft.questions()[0].correct_index, 3);
    }

    #[test]
    fn test_from_questions_pads_options() {
        let stored = vec![QuizQuestion {
            id: "q1".into(),
            question: "Polaris?".into(),
            options: vec!["Orion".into(), "Ursa Minor".into()],
            correct_index: 1,
        }];
        let draft = QuizDraft::from_questions(&stored);
        assert_eq!(draft.questions()[0].options.len(), 4);
        assert_eq!(draft.finalize(), Err(FormError::NoCompleteQuestion));
        assert_eq!(QuizDraft::from_questions(&[]).len(), 1);
    }

    #[test]
    fn test_stored_invalid_correct_index_is_reported() {
        let stored = vec![QuizQuestion {
            id: "q1".into(),
            question: "Polaris?".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 7,
        }];
        let draft = QuizDraft::from_questions(&stored);
        assert_eq!(draft.finalize(), Err(FormError::InvalidCorrectIndex { index: 7, options: 4 }));
    }
}
