use crate::models::domain::{GradedResult, QuizQuestion};

/// Everything the results route needs once an attempt is graded.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsHandoff {
    pub result: GradedResult,
    pub quiz_title: String,
    pub course_id: Option<String>,
    pub questions: Vec<QuizQuestion>,
}

/// Navigation collaborator: the session only ever leaves through one of these two exits.
pub trait RouteHandoff: Send + Sync {
    fn show_results(&self, handoff: &ResultsHandoff);
    fn return_to_courses(&self, reason: &str);
}
