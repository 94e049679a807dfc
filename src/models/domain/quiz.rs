use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz_question::QuizQuestion;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub time_limit_minutes: u32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: f64, // percentage
    pub total_points: u32,
    #[validate(length(min = 1, message = "Quiz has no questions"))]
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_minutes.saturating_mul(60)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Field validation plus the per-question shape checks the derive cannot express.
    pub fn ensure_playable(&self) -> AppResult<()> {
        self.validate()?;

        if let Some(question) = self.questions.iter().find(|q| !q.is_well_formed()) {
            return Err(AppError::Invalid(format!(
                "Question '{}' has too few options",
                question.id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn fixture_quiz_is_playable() {
        let quiz = fixtures::true_false_quiz();

        assert!(quiz.ensure_playable().is_ok());
        assert_eq!(quiz.time_limit_seconds(), 60);
        assert_eq!(quiz.question_count(), 2);
    }

    #[test]
    fn quiz_without_questions_is_rejected() {
        let mut quiz = fixtures::true_false_quiz();
        quiz.questions.clear();

        assert!(matches!(quiz.ensure_playable(), Err(AppError::Invalid(_))));
    }

    #[test]
    fn quiz_with_zero_time_limit_is_rejected() {
        let mut quiz = fixtures::true_false_quiz();
        quiz.time_limit_minutes = 0;

        assert!(quiz.ensure_playable().is_err());
    }

    #[test]
    fn quiz_with_malformed_choice_question_is_rejected() {
        let mut quiz = fixtures::mixed_quiz();
        quiz.questions[0].options.truncate(1);

        assert!(matches!(quiz.ensure_playable(), Err(AppError::Invalid(_))));
    }

    #[test]
    fn quiz_parses_backend_payload() {
        let quiz: Quiz = serde_json::from_value(serde_json::json!({
            "id": "quiz-1",
            "title": "Ownership basics",
            "timeLimitMinutes": 10,
            "passingScore": 70,
            "totalPoints": 2,
            "questions": [
                { "id": "q-1", "text": "Pick the owner", "type": "multiple_choice",
                  "options": ["a", "b", "c"], "points": 1 },
                { "id": "q-2", "text": "Moves invalidate the source", "type": "true_false",
                  "points": 1 }
            ]
        }))
        .unwrap();

        assert_eq!(quiz.passing_score, 70.0);
        assert_eq!(quiz.questions[0].options.len(), 3);
        assert!(quiz.ensure_playable().is_ok());
    }
}
