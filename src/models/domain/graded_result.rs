use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// The server's verdict for a submitted attempt. Immutable once received.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradedResult {
    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage: f64,
    pub passed: bool,
    pub points_earned: u32,
    pub total_points: u32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: f64,
    #[serde(default)]
    pub answers: Vec<GradedAnswer>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub question_id: String,
    #[serde(default)]
    pub user_answer: Value,
    pub is_correct: bool,
    pub points_earned: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl GradedResult {
    /// Pass boundary is inclusive: a score equal to the threshold passes.
    pub fn meets_threshold(percentage: f64, passing_score: f64) -> bool {
        percentage >= passing_score
    }

    pub fn ensure_well_formed(&self, question_count: usize) -> AppResult<()> {
        self.validate()?;

        if self.points_earned > self.total_points {
            return Err(AppError::Invalid(format!(
                "Graded result awards {} of {} points",
                self.points_earned, self.total_points
            )));
        }

        if self.answers.len() != question_count {
            return Err(AppError::Invalid(format!(
                "Graded result covers {} answers but the quiz has {} questions",
                self.answers.len(),
                question_count
            )));
        }

        Ok(())
    }
}
