use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::quiz_question::{QuizQuestion, QuizQuestionType};

/// A learner's selection for one question. `Unset` is the "unanswered" sentinel,
/// so `Choice(0)` is a real answer.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AnswerValue {
    #[default]
    Unset,
    Choice(usize),
    Literal(String), // "true" / "false" for boolean questions
}

impl AnswerValue {
    pub fn is_answer_for(&self, question: &QuizQuestion) -> bool {
        match (question.question_type, self) {
            (QuizQuestionType::SingleChoice, AnswerValue::Choice(index)) => {
                *index < question.options.len()
            }
            (QuizQuestionType::TrueFalse, AnswerValue::Literal(value)) => {
                value == "true" || value == "false"
            }
            _ => false,
        }
    }

    /// Wire form sent to the grading backend; unanswered questions go out as `null`.
    pub fn to_wire(&self) -> Value {
        match self {
            AnswerValue::Unset => Value::Null,
            AnswerValue::Choice(index) => Value::from(*index),
            AnswerValue::Literal(value) => Value::from(value.as_str()),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Literal(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
    pub time_spent_seconds: u32,
}

impl Answer {
    pub fn unanswered(question_id: &str) -> Self {
        Answer {
            question_id: question_id.to_string(),
            value: AnswerValue::Unset,
            time_spent_seconds: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitOrigin {
    Manual,
    Auto, // deadline reached
}

impl fmt::Display for SubmitOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOrigin::Manual => write!(f, "manual"),
            SubmitOrigin::Auto => write!(f, "auto"),
        }
    }
}

/// Lifecycle of an attempt. `Submitting` doubles as the in-flight guard and
/// `Terminal` is never left once reached.
#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum AttemptState {
    NotStarted,
    InProgress,
    Submitting(SubmitOrigin),
    Terminal,
}

impl AttemptState {
    pub fn accepts_answers(&self) -> bool {
        matches!(self, AttemptState::InProgress)
    }

    pub fn is_submission_locked(&self) -> bool {
        matches!(self, AttemptState::Submitting(_) | AttemptState::Terminal)
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptState::NotStarted => write!(f, "not_started"),
            AttemptState::InProgress => write!(f, "in_progress"),
            AttemptState::Submitting(origin) => write!(f, "submitting({})", origin),
            AttemptState::Terminal => write!(f, "terminal"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub answers: Vec<Answer>,
    pub started_at: DateTime<Utc>,
    pub state: AttemptState,
}
