use serde::Serialize;
use serde_json::Value;

use crate::models::domain::quiz_attempt::{Answer, SubmitOrigin};

/// Body of `POST /quizzes/attempts/{attempt_id}/submit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    #[serde(skip)]
    pub attempt_id: String, // goes into the path
    pub answers: Vec<SubmittedAnswer>,
    pub time_spent: u32,
    pub auto_submitted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub answer: Value,
    pub time_spent: u32,
}

impl From<&Answer> for SubmittedAnswer {
    fn from(answer: &Answer) -> Self {
        SubmittedAnswer {
            question_id: answer.question_id.clone(),
            answer: answer.value.to_wire(),
            time_spent: answer.time_spent_seconds,
        }
    }
}

impl SubmitAttemptRequest {
    pub fn new(attempt_id: &str, answers: &[Answer], elapsed_seconds: u32, origin: SubmitOrigin) -> Self {
        SubmitAttemptRequest {
            attempt_id: attempt_id.to_string(),
            answers: answers.iter().map(SubmittedAnswer::from).collect(),
            time_spent: elapsed_seconds,
            auto_submitted: origin == SubmitOrigin::Auto,
        }
    }
}
