use serde::Deserialize;

use crate::models::domain::Quiz;

/// Envelope the backend wraps every successful payload in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of `POST /quizzes/{quiz_id}/start`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAttemptResponse {
    pub attempt_id: String,
    pub quiz: Quiz,
}
