use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not enrolled: {0}")]
    NotEnrolled(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Already completed: {0}")]
    AlreadyCompleted(String),

    #[error("A submission is already in progress for this attempt")]
    AlreadySubmitting,

    #[error("Already submitted: {0}")]
    AlreadySubmitted(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    Invalid(String),

    #[error("Quiz session is closed")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::NotEnrolled(_) => "NOT_ENROLLED",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::AlreadyCompleted(_) => "ALREADY_COMPLETED",
            AppError::AlreadySubmitting => "ALREADY_SUBMITTING",
            AppError::AlreadySubmitted(_) => "ALREADY_SUBMITTED",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Invalid(_) => "INVALID",
            AppError::SessionClosed => "SESSION_CLOSED",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Transient failures the learner may retry by hand.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Network(_))
    }

    /// Text shown to the learner through the notification collaborator.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(_) => "This quiz could not be found.".to_string(),
            AppError::NotEnrolled(_) => {
                "You need to be enrolled in this course to take the quiz.".to_string()
            }
            AppError::Unauthorized(_) => "Please sign in again to continue.".to_string(),
            AppError::AlreadyCompleted(_) => "You have already completed this quiz.".to_string(),
            AppError::AlreadySubmitting => "Your answers are already being submitted.".to_string(),
            AppError::AlreadySubmitted(_) => "This attempt was already submitted.".to_string(),
            AppError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            AppError::Invalid(_) => "The server sent data we could not understand.".to_string(),
            AppError::SessionClosed => "This quiz session has ended.".to_string(),
            AppError::Config(msg) => format!("Misconfigured client: {}", msg),
        }
    }

    /// Maps a non-success response of the grading backend onto the taxonomy.
    /// `conflict` picks the variant for 409, which differs between start and submit.
    pub fn from_status(status: u16, message: String, conflict: fn(String) -> AppError) -> Self {
        match status {
            401 => AppError::Unauthorized(message),
            403 => AppError::NotEnrolled(message),
            404 => AppError::NotFound(message),
            409 => conflict(message),
            400 | 422 => AppError::Invalid(message),
            _ => AppError::Network(format!("HTTP {}: {}", status, message)),
        }
    }
}

/// Error body returned by the grading backend.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub code: Option<u16>,
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Invalid(format!("Malformed response body: {}", err))
        } else {
            AppError::Network(err.to_string())
        }
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Invalid(format!("JSON error: {}", err))
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Invalid(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound("quiz".into()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::AlreadySubmitting.error_code(), "ALREADY_SUBMITTING");
        assert_eq!(
            AppError::Network("timeout".into()).error_code(),
            "NETWORK_ERROR"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("quiz".into());
        assert_eq!(err.to_string(), "Not found: quiz");
    }

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(AppError::Network("reset".into()).is_retryable());
        assert!(!AppError::NotEnrolled("no".into()).is_retryable());
        assert!(!AppError::AlreadySubmitting.is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        let start_conflict = AppError::AlreadyCompleted;
        let submit_conflict = AppError::AlreadySubmitted;

        assert_eq!(
            AppError::from_status(403, "x".into(), start_conflict),
            AppError::NotEnrolled("x".into())
        );
        assert_eq!(
            AppError::from_status(409, "x".into(), start_conflict),
            AppError::AlreadyCompleted("x".into())
        );
        assert_eq!(
            AppError::from_status(409, "x".into(), submit_conflict),
            AppError::AlreadySubmitted("x".into())
        );
        assert!(matches!(
            AppError::from_status(502, "bad gateway".into(), submit_conflict),
            AppError::Network(_)
        ));
    }
}
