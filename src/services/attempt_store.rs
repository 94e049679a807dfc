use chrono::Utc;

use crate::{
    clients::GradingClient,
    errors::{AppError, AppResult},
    models::{
        domain::{Answer, AnswerValue, AttemptState, Quiz, QuizAttempt},
        dto::StartAttemptResponse,
    },
    services::countdown_timer::{Countdown, TickOutcome},
};

/// In-memory state of the attempt being taken. Only the session that
/// started it holds one; it is dropped once the attempt reaches an outcome.
#[derive(Debug, Clone)]
pub struct AttemptStore {
    quiz: Quiz,
    attempt: QuizAttempt,
    countdown: Countdown,
}

impl AttemptStore {
    /// Asks the backend for a new attempt of `quiz_id`.
    pub async fn start(client: &dyn GradingClient, quiz_id: &str) -> AppResult<Self> {
        let response = client.start_attempt(quiz_id).await?;
        let store = Self::from_start_response(response)?;

        log::info!(
            "Started attempt {} of quiz {} ({} questions, {} seconds)",
            store.attempt.id,
            store.quiz.id,
            store.quiz.question_count(),
            store.countdown.remaining_seconds()
        );

        Ok(store)
    }

    pub fn from_start_response(response: StartAttemptResponse) -> AppResult<Self> {
        let StartAttemptResponse { attempt_id, quiz } = response;

        if attempt_id.trim().is_empty() {
            return Err(AppError::Invalid("Backend issued an empty attempt id".to_string()));
        }
        quiz.ensure_playable()?;

        let answers = quiz
            .questions
            .iter()
            .map(|question| Answer::unanswered(&question.id))
            .collect();

        let mut countdown = Countdown::new(quiz.time_limit_seconds());
        countdown.start();

        let attempt = QuizAttempt {
            id: attempt_id,
            quiz_id: quiz.id.clone(),
            answers,
            started_at: Utc::now(),
            state: AttemptState::InProgress,
        };

        Ok(Self {
            quiz,
            attempt,
            countdown,
        })
    }

    /// Overwrites the answer at `index`. Returns `false` without touching
    /// anything once the attempt is locked.
    pub fn set_answer(&mut self, index: usize, value: AnswerValue) -> AppResult<bool> {
        if index >= self.attempt.answers.len() {
            return Err(AppError::Invalid(format!(
                "Question index {} is out of range (quiz has {} questions)",
                index,
                self.attempt.answers.len()
            )));
        }

        if self.is_locked() {
            log::debug!(
                "Ignoring answer for question {} of attempt {} in state {}",
                index,
                self.attempt.id,
                self.attempt.state
            );
            return Ok(false);
        }

        self.attempt.answers[index].value = value;
        Ok(true)
    }

    pub fn is_answered(&self, index: usize) -> bool {
        match (self.quiz.questions.get(index), self.attempt.answers.get(index)) {
            (Some(question), Some(answer)) => answer.value.is_answer_for(question),
            _ => false,
        }
    }

    pub fn answered_count(&self) -> usize {
        (0..self.attempt.answers.len())
            .filter(|&index| self.is_answered(index))
            .count()
    }

    /// Best-effort time tracking for the question on screen.
    pub fn credit_time(&mut self, index: usize, seconds: u32) {
        if let Some(answer) = self.attempt.answers.get_mut(index) {
            answer.time_spent_seconds = answer.time_spent_seconds.saturating_add(seconds);
        }
    }

    /// Answers freeze while a submission is pending, after the attempt is
    /// terminal, and once the deadline has passed.
    pub fn is_locked(&self) -> bool {
        !self.attempt.state.accepts_answers() || self.countdown.is_expired()
    }

    pub fn tick_countdown(&mut self) -> TickOutcome {
        self.countdown.tick()
    }

    pub fn stop_countdown(&mut self) {
        self.countdown.stop();
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.countdown.elapsed_seconds()
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn attempt(&self) -> &QuizAttempt {
        &self.attempt
    }

    pub fn answers(&self) -> &[Answer] {
        &self.attempt.answers
    }

    pub fn state(&self) -> AttemptState {
        self.attempt.state
    }

    pub(crate) fn set_state(&mut self, state: AttemptState) {
        log::debug!(
            "Attempt {} moves from {} to {}",
            self.attempt.id,
            self.attempt.state,
            state
        );
        self.attempt.state = state;
    }
}
