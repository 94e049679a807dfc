pub mod confirmation;
pub mod grading_client;
pub mod navigation;
pub mod notifier;

pub use confirmation::{AlwaysConfirm, SubmitConfirmation, SubmitSummary};
pub use grading_client::{GradingClient, HttpGradingClient};
pub use navigation::{ResultsHandoff, RouteHandoff};
pub use notifier::{LogNotifier, NoticeLevel, Notifier};
