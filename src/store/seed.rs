//! 既定データ（ストレージに何もないときの内容）

use serde_json::{Map, Value};

use crate::utils::log_trace::log_error;

const SEED_JSON: &str = include_str!("../../data/seed.json");

/// 既定データをJSONオブジェクトとして返す
pub fn default_document() -> Map<String, Value> {
    match serde_json::from_str::<Value>(SEED_JSON) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log_error("store", "seed data is not a JSON object");
            Map::new()
        }
        Err(e) => {
            log_error("store", &format!("seed data is not valid JSON: {}", e));
            Map::new()
        }
    }
}

/// 既定データ
#[cfg(test)]
pub fn default_data() -> crate::models::SiteData {
    serde_json::from_value(Value::Object(default_document())).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventCategory, ReviewStatus, SiteData};

    #[test]
    fn test_seed_parses_into_every_collection() {
        let doc = default_document();
        assert_eq!(doc.len(), 13);
        let data: SiteData = serde_json::from_value(Value::Object(doc)).unwrap();
        assert_eq!(data.events.len(), 5);
        assert_eq!(data.events[0].category, EventCategory::Workshop);
        assert!(data.events[0].featured);
        assert_eq!(data.competitions[0].categories.len(), 4);
        assert_eq!(data.team.len(), 6);
        assert_eq!(data.resources.len(), 6);
        assert_eq!(data.registrations[0].status, ReviewStatus::Pending);
        assert!(data.messages.is_empty());
        assert!(data.quiz_attempts.is_empty());
    }

    #[test]
    fn test_seed_quiz_is_complete() {
        let data = default_data();
        let quiz = data.quiz("quiz-1").unwrap();
        let correct: Vec<usize> = quiz.questions.iter().map(|q| q.correct_index).collect();
        assert_eq!(correct, vec![1, 0, 1]);
        assert!(quiz.questions.iter().all(|q| q.options.len() == 4));
    }
}
