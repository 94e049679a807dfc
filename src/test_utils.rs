#[cfg(test)]
pub mod fixtures {
    use serde_json::json;

    use crate::{
        models::{
            domain::{GradedAnswer, GradedResult, Quiz, QuizQuestion, QuizQuestionType},
            dto::StartAttemptResponse,
        },
        services::attempt_store::AttemptStore,
    };

    /// Two true/false questions, one minute, 50% to pass.
    pub fn true_false_quiz() -> Quiz {
        Quiz {
            id: "quiz-tf".to_string(),
            title: "Ownership check".to_string(),
            description: None,
            time_limit_minutes: 1,
            passing_score: 50.0,
            total_points: 2,
            questions: vec![
                QuizQuestion {
                    id: "q-1".to_string(),
                    text: "Every value has exactly one owner".to_string(),
                    question_type: QuizQuestionType::TrueFalse,
                    options: vec![],
                    points: 1,
                    explanation: None,
                },
                QuizQuestion {
                    id: "q-2".to_string(),
                    text: "Borrowing a value moves it".to_string(),
                    question_type: QuizQuestionType::TrueFalse,
                    options: vec![],
                    points: 1,
                    explanation: Some("Borrowing never moves a value.".to_string()),
                },
            ],
        }
    }

    /// One single-choice and one true/false question.
    pub fn mixed_quiz() -> Quiz {
        Quiz {
            id: "quiz-mixed".to_string(),
            title: "Smart pointers".to_string(),
            description: Some("Heap allocation and borrowing".to_string()),
            time_limit_minutes: 5,
            passing_score: 70.0,
            total_points: 3,
            questions: vec![
                QuizQuestion {
                    id: "q-choice".to_string(),
                    text: "Which type is a unique mutable borrow?".to_string(),
                    question_type: QuizQuestionType::SingleChoice,
                    options: vec!["Box<T>".to_string(), "Rc<T>".to_string(), "&mut T".to_string()],
                    points: 2,
                    explanation: None,
                },
                QuizQuestion {
                    id: "q-bool".to_string(),
                    text: "Rc<T> is thread safe".to_string(),
                    question_type: QuizQuestionType::TrueFalse,
                    options: vec![],
                    points: 1,
                    explanation: None,
                },
            ],
        }
    }

    pub fn start_response(quiz: Quiz) -> StartAttemptResponse {
        StartAttemptResponse {
            attempt_id: "attempt-1".to_string(),
            quiz,
        }
    }

    pub fn true_false_store() -> AttemptStore {
        AttemptStore::from_start_response(start_response(true_false_quiz()))
            .expect("fixture quiz is playable")
    }

    pub fn mixed_store() -> AttemptStore {
        AttemptStore::from_start_response(start_response(mixed_quiz()))
            .expect("fixture quiz is playable")
    }

    /// Result for `true_false_quiz` with q-1 right and q-2 unanswered.
    pub fn graded_result(percentage: f64, passed: bool) -> GradedResult {
        GradedResult {
            percentage,
            passed,
            points_earned: 1,
            total_points: 2,
            passing_score: 50.0,
            answers: vec![
                GradedAnswer {
                    question_id: "q-1".to_string(),
                    user_answer: json!("true"),
                    is_correct: true,
                    points_earned: 1,
                    correct_answer: Some(json!("true")),
                    explanation: None,
                },
                GradedAnswer {
                    question_id: "q-2".to_string(),
                    user_answer: serde_json::Value::Null,
                    is_correct: false,
                    points_earned: 0,
                    correct_answer: Some(json!("false")),
                    explanation: None,
                },
            ],
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use crate::clients::{NoticeLevel, Notifier, ResultsHandoff, RouteHandoff};

    /// Keeps every notice for later assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub notices: Mutex<Vec<(NoticeLevel, String)>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, level: NoticeLevel, message: &str) {
            self.notices.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[derive(Default)]
    pub struct RecordingRoutes {
        pub results: Mutex<Vec<ResultsHandoff>>,
        pub course_returns: Mutex<Vec<String>>,
    }

    impl RouteHandoff for RecordingRoutes {
        fn show_results(&self, handoff: &ResultsHandoff) {
            self.results.lock().unwrap().push(handoff.clone());
        }

        fn return_to_courses(&self, reason: &str) {
            self.course_returns.lock().unwrap().push(reason.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_quizzes_are_playable() {
        assert!(true_false_quiz().ensure_playable().is_ok());
        assert!(mixed_quiz().ensure_playable().is_ok());
    }

    #[test]
    fn test_fixture_result_is_well_formed() {
        let result = graded_result(50.0, true);

        assert!(result.ensure_well_formed(true_false_quiz().questions.len()).is_ok());
        assert_eq!(result.answers.len(), 2);
    }
}
