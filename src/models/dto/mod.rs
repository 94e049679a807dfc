pub mod request;
pub mod response;

pub use request::{SubmitAttemptRequest, SubmittedAnswer};
pub use response::{ApiResponse, StartAttemptResponse};
