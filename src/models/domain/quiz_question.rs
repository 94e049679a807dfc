use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuizQuestionType,
    #[serde(default)]
    pub options: Vec<String>, // empty for true/false questions
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>, // only sent back after grading
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum QuizQuestionType {
    #[serde(rename = "multiple_choice", alias = "single")]
    SingleChoice, // Pick exactly one of the options
    #[serde(rename = "true_false", alias = "boolean")]
    TrueFalse,
}

impl QuizQuestion {
    /// Human readable label for a stored option index.
    pub fn option_label(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn is_well_formed(&self) -> bool {
        match self.question_type {
            QuizQuestionType::SingleChoice => self.options.len() >= 2,
            QuizQuestionType::TrueFalse => true,
        }
    }
}
