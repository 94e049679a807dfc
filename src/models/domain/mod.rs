pub mod graded_result;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub use graded_result::{GradedAnswer, GradedResult};
pub use quiz::Quiz;
pub use quiz_attempt::{Answer, AnswerValue, AttemptState, QuizAttempt, SubmitOrigin};
pub use quiz_question::{QuizQuestion, QuizQuestionType};
