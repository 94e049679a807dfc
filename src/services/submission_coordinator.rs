use crate::{
    clients::GradingClient,
    errors::{AppError, AppResult},
    models::{
        domain::{AttemptState, GradedResult, SubmitOrigin},
        dto::SubmitAttemptRequest,
    },
    services::attempt_store::AttemptStore,
};

/// Where an attempt stands once a submission round-trip has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Graded,
    AlreadySubmitted,
    Fatal,
    Retryable(SubmitOrigin),
    Ignored, // no submission was pending
}

/// Single submission path shared by manual and automatic submits. The
/// attempt's `Submitting` state is the only guard against duplicates.
pub struct SubmissionCoordinator;

impl SubmissionCoordinator {
    /// Locks the attempt and builds the grading request. A second call while
    /// the first is outstanding, or after the attempt is terminal, fails with
    /// `AlreadySubmitting` and changes nothing.
    pub fn begin(store: &mut AttemptStore, origin: SubmitOrigin) -> AppResult<SubmitAttemptRequest> {
        match store.state() {
            AttemptState::InProgress => {}
            AttemptState::Submitting(_) | AttemptState::Terminal => {
                return Err(AppError::AlreadySubmitting)
            }
            AttemptState::NotStarted => {
                return Err(AppError::Invalid("Attempt has not been started".to_string()))
            }
        }

        store.set_state(AttemptState::Submitting(origin));

        Ok(SubmitAttemptRequest::new(
            &store.attempt().id,
            store.answers(),
            store.elapsed_seconds(),
            origin,
        ))
    }

    pub async fn send(
        client: &dyn GradingClient,
        request: SubmitAttemptRequest,
        question_count: usize,
    ) -> AppResult<GradedResult> {
        let attempt_id = request.attempt_id.clone();
        let result = client.submit_attempt(request).await?;
        result.ensure_well_formed(question_count)?;

        log::info!(
            "Attempt {} graded: {:.1}% ({}/{} points, passed: {})",
            attempt_id,
            result.percentage,
            result.points_earned,
            result.total_points,
            result.passed
        );

        Ok(result)
    }

    /// Applies the outcome of `send` to the attempt.
    pub fn finish(store: &mut AttemptStore, outcome: &AppResult<GradedResult>) -> Settlement {
        let AttemptState::Submitting(origin) = store.state() else {
            return Settlement::Ignored;
        };

        match outcome {
            Ok(_) => {
                store.stop_countdown();
                store.set_state(AttemptState::Terminal);
                Settlement::Graded
            }
            Err(AppError::AlreadySubmitted(_)) => {
                store.stop_countdown();
                store.set_state(AttemptState::Terminal);
                Settlement::AlreadySubmitted
            }
            Err(AppError::Invalid(_)) => {
                store.stop_countdown();
                store.set_state(AttemptState::Terminal);
                Settlement::Fatal
            }
            Err(err) => {
                log::warn!(
                    "{} submission of attempt {} failed: {}",
                    origin,
                    store.attempt().id,
                    err
                );
                store.set_state(AttemptState::InProgress);
                Settlement::Retryable(origin)
            }
        }
    }

    /// `begin`, `send` and `finish` in one call, for callers that can hold
    /// the store across the round-trip.
    pub async fn submit(
        store: &mut AttemptStore,
        client: &dyn GradingClient,
        origin: SubmitOrigin,
    ) -> AppResult<GradedResult> {
        let request = Self::begin(store, origin)?;
        let outcome = Self::send(client, request, store.quiz().question_count()).await;
        Self::finish(store, &outcome);
        outcome
    }
}
