pub mod attempt_store;
pub mod countdown_timer;
pub mod question_navigator;
pub mod quiz_session;
pub mod results_presenter;
pub mod submission_coordinator;

pub use attempt_store::AttemptStore;
pub use countdown_timer::{Countdown, CountdownTimer, TickOutcome, TimerState};
pub use question_navigator::{Progress, QuestionNavigator};
pub use quiz_session::{CurrentQuestion, QuizSession, SessionOutcome, SessionSnapshot};
pub use results_presenter::{PerformanceTier, QuestionReview, ResultsPresenter, ResultsReport, Verdict};
pub use submission_coordinator::{Settlement, SubmissionCoordinator};
