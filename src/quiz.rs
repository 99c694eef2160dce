//! クイズの採点と提出
//!
//! 採点は同期・決定的。未回答の問題は解答表にキーがなく、
//! 記録上は `selected = -1` になるので正解と一致することはない。

use std::collections::BTreeMap;

use serde_json::json;

use crate::errors::QuizError;
use crate::models::{AttemptAnswer, Quiz, QuizAttempt};
use crate::store::{KeyValueStorage, Store};
use crate::utils::log_trace::log_info_with_data;
use crate::utils::{new_record_id, today};

/// 問題ID → 選んだ選択肢の番号
pub type AnswerSheet = BTreeMap<String, usize>;

/// 受験者（名前とメールは必須）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

impl Participant {
    pub fn new(name: &str, email: &str) -> Self {
        Self { name: name.to_string(), email: email.to_string() }
    }

    /// 前後の空白を除いて、どちらも空でなければOK
    pub fn validated(&self) -> Result<Participant, QuizError> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(QuizError::MissingParticipant);
        }
        Ok(Participant::new(name, email))
    }
}

/// 採点して解答記録を作る（保存はしない）
///
/// `total` は提出時点の問題数。後からクイズを編集しても記録は変わらない。
pub fn grade(
    quiz: &Quiz,
    participant: &Participant,
    answers: &AnswerSheet,
    id: String,
    date: String,
) -> Result<QuizAttempt, QuizError> {
    let participant = participant.validated()?;

    let answers: Vec<AttemptAnswer> = quiz
        .questions
        .iter()
        .map(|q| AttemptAnswer {
            question_id: q.id.clone(),
            selected: answers
                .get(&q.id)
                .and_then(|&i| i64::try_from(i).ok())
                .unwrap_or(AttemptAnswer::UNANSWERED),
            correct: q.correct_index,
        })
        .collect();
    let score = answers.iter().filter(|a| a.is_correct()).count();

    Ok(QuizAttempt {
        id,
        quiz_id: quiz.id.clone(),
        name: participant.name,
        email: participant.email,
        score,
        total: quiz.questions.len(),
        date,
        answers,
    })
}

/// 公開ページからの提出。採点して追記保存する
pub fn submit_attempt<S: KeyValueStorage>(
    store: &Store<S>,
    quiz_id: &str,
    participant: &Participant,
    answers: &AnswerSheet,
) -> Result<QuizAttempt, QuizError> {
    let quiz = store
        .get_quizzes()
        .into_iter()
        .find(|q| q.id == quiz_id)
        .ok_or_else(|| QuizError::QuizNotFound(quiz_id.to_string()))?;

    let attempt = grade(&quiz, participant, answers, new_record_id(), today())?;
    store.save_quiz_attempt(attempt.clone())?;

    log_info_with_data(
        "quiz",
        "attempt submitted",
        json!({ "quizId": attempt.quiz_id, "score": attempt.score, "total": attempt.total }),
    );
    Ok(attempt)
}

/// 提出後に出すメッセージ
pub fn score_message(attempt: &QuizAttempt) -> String {
    format!("Submitted! You scored {}/{}.", attempt.score, attempt.total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuizQuestion;
    use crate::store::MemoryStorage;

    fn three_question_quiz() -> Quiz {
        let question = |id: &str, correct: usize| QuizQuestion {
            id: id.to_string(),
            question: format!("Question {}", id),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: correct,
        };
        Quiz {
            id: "quiz-x".into(),
            title: "Test".into(),
            questions: vec![question("q1", 1), question("q2", 0), question("q3", 1)],
            ..Default::default()
        }
    }

    fn sheet(pairs: &[(&str, usize)]) -> AnswerSheet {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn vega() -> Participant {
        Participant::new("Vega", "vega@example.com")
    }

    #[test]
    fn test_partial_score() {
        let quiz = three_question_quiz();
        let answers = sheet(&[("q1", 1), ("q2", 0), ("q3", 0)]);
        let attempt = grade(&quiz, &vega(), &answers, "a1".into(), "2026-03-01".into()).unwrap();
        assert_eq!((attempt.score, attempt.total), (2, 3));
        assert_eq!(attempt.answers[2].selected, 0);
        assert_eq!(attempt.answers[2].correct, 1);
    }

    #[test]
    fn test_no_answers_scores_zero() {
        let quiz = three_question_quiz();
        let attempt = grade(&quiz, &vega(), &AnswerSheet::new(), "a1".into(), "2026-03-01".into()).unwrap();
        assert_eq!((attempt.score, attempt.total), (0, 3));
        assert!(attempt.answers.iter().all(|a| a.selected == AttemptAnswer::UNANSWERED));
    }

    #[test]
    fn test_only_first_answered() {
        let quiz = three_question_quiz();
        let attempt = grade(&quiz, &vega(), &sheet(&[("q1", 1)]), "a1".into(), "2026-03-01".into()).unwrap();
        assert_eq!((attempt.score, attempt.total), (1, 3));
        assert_eq!(attempt.answers[1].selected, -1);
    }

    #[test]
    fn test_blank_participant_rejected() {
        let quiz = three_question_quiz();
        let blank = Participant::new("  ", "vega@example.com");
        assert!(matches!(
            grade(&quiz, &blank, &AnswerSheet::new(), "a1".into(), "2026-03-01".into()),
            Err(QuizError::MissingParticipant)
        ));
        let trimmed = Participant::new(" Vega ", " vega@example.com").validated().unwrap();
        assert_eq!(trimmed, vega());
    }

    #[test]
    fn test_submit_appends_and_keeps_snapshot_total() {
        let store = Store::new(MemoryStorage::new(), "quiz_test");
        let mut quiz = three_question_quiz();
        store.save_quiz(quiz.clone()).unwrap();

        let attempt = submit_attempt(&store, "quiz-x", &vega(), &sheet(&[("q1", 1)])).unwrap();
        assert_eq!(score_message(&attempt), "Submitted! You scored 1/3.");

        quiz.questions.pop();
        store.save_quiz(quiz).unwrap();

        let attempts = store.get_quiz_attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].total, 3);
        assert_eq!(attempts[0].date.len(), 10);
    }

    #[test]
    fn test_submit_unknown_quiz() {
        let store = Store::new(MemoryStorage::new(), "quiz_test");
        let err = submit_attempt(&store, "missing", &vega(), &AnswerSheet::new()).unwrap_err();
        assert!(matches!(err, QuizError::QuizNotFound(id) if id == "missing"));
        assert!(store.get_quiz_attempts().is_empty());
    }

    #[test]
    fn test_seed_quiz_grades() {
        let store = Store::new(MemoryStorage::new(), "quiz_test");
        let attempt = submit_attempt(&store, "quiz-1", &vega(), &sheet(&[("q1", 1), ("q2", 0), ("q3", 1)])).unwrap();
        assert_eq!((attempt.score, attempt.total), (3, 3));
    }
}
