use std::{ops::ControlFlow, sync::Arc};

use tokio::{
    sync::{mpsc, oneshot},
    task::{JoinError, JoinHandle},
    time::Instant,
};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    clients::{
        GradingClient, NoticeLevel, Notifier, ResultsHandoff, RouteHandoff, SubmitConfirmation,
        SubmitSummary,
    },
    errors::{AppError, AppResult},
    models::domain::{AnswerValue, AttemptState, GradedResult, QuizQuestion, SubmitOrigin},
    services::{
        attempt_store::AttemptStore,
        countdown_timer::{CountdownTimer, TickOutcome, TimerState},
        question_navigator::{Progress, QuestionNavigator},
        submission_coordinator::{Settlement, SubmissionCoordinator},
    },
};

const LOW_TIME_WARNING_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed(Box<ResultsHandoff>),
    AlreadySubmitted,
    Cancelled,
    Aborted(String),
}

impl SessionOutcome {
    fn label(&self) -> &'static str {
        match self {
            SessionOutcome::Completed(_) => "completed",
            SessionOutcome::AlreadySubmitted => "already submitted",
            SessionOutcome::Cancelled => "cancelled",
            SessionOutcome::Aborted(_) => "aborted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub attempt_id: String,
    pub quiz_title: String,
    pub current_index: usize,
    pub remaining_seconds: u32,
    pub timer: TimerState,
    pub state: AttemptState,
    pub progress: Progress,
    pub answered: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentQuestion {
    pub index: usize,
    pub total: usize,
    pub question: QuizQuestion,
    pub answer: AnswerValue,
}

#[derive(Debug, Clone, Copy)]
enum NavTarget {
    Index(usize),
    Next,
    Previous,
}

enum SessionCommand {
    Snapshot(oneshot::Sender<SessionSnapshot>),
    CurrentQuestion(oneshot::Sender<CurrentQuestion>),
    SetAnswer {
        index: usize,
        value: AnswerValue,
        reply: oneshot::Sender<AppResult<bool>>,
    },
    Navigate {
        target: NavTarget,
        reply: oneshot::Sender<usize>,
    },
    Submit(oneshot::Sender<AppResult<GradedResult>>),
    Cancel(oneshot::Sender<()>),
}

/// Handle to a running quiz session. The attempt itself lives inside the
/// session task; every interaction is a message to it. Dropping the handle
/// cancels the session.
pub struct QuizSession {
    session_id: Uuid,
    commands: mpsc::Sender<SessionCommand>,
    confirmation: Arc<dyn SubmitConfirmation>,
    task: JoinHandle<SessionOutcome>,
}

impl QuizSession {
    /// Starts an attempt of `quiz_id` and the countdown that goes with it. On
    /// failure the learner is sent back to the course listing and no timer runs.
    pub async fn start(state: &AppState, quiz_id: &str, course_id: Option<&str>) -> AppResult<Self> {
        let session_id = Uuid::new_v4();
        log::info!("Session {} starting quiz {}", session_id, quiz_id);

        let store = match AttemptStore::start(state.grading_client.as_ref(), quiz_id).await {
            Ok(store) => store,
            Err(err) => {
                log::warn!("Session {} could not start quiz {}: {}", session_id, quiz_id, err);
                let message = err.user_message();
                state.notifier.notify(NoticeLevel::Error, &message);
                state.routes.return_to_courses(&message);
                return Err(err);
            }
        };

        state.notifier.notify(
            NoticeLevel::Info,
            &format!(
                "Quiz started. You have {} minute(s) to answer {} question(s).",
                store.quiz().time_limit_minutes,
                store.quiz().question_count()
            ),
        );

        let (commands, receiver) = mpsc::channel(state.config.command_buffer);
        let actor = SessionActor {
            session_id,
            course_id: course_id.map(str::to_string),
            navigator: QuestionNavigator::new(store.quiz().question_count()),
            store,
            timer: Some(CountdownTimer::start()),
            in_flight: None,
            grading: Arc::clone(&state.grading_client),
            notifier: Arc::clone(&state.notifier),
            routes: Arc::clone(&state.routes),
        };
        let task = tokio::spawn(actor.run(receiver));

        Ok(Self {
            session_id,
            commands,
            confirmation: Arc::clone(&state.confirmation),
            task,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> AppResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| AppError::SessionClosed)?;
        response.await.map_err(|_| AppError::SessionClosed)
    }

    pub async fn snapshot(&self) -> AppResult<SessionSnapshot> {
        self.request(SessionCommand::Snapshot).await
    }

    pub async fn current_question(&self) -> AppResult<CurrentQuestion> {
        self.request(SessionCommand::CurrentQuestion).await
    }

    /// Returns `false` when the attempt no longer accepts answers.
    pub async fn set_answer(&self, index: usize, value: AnswerValue) -> AppResult<bool> {
        self.request(|reply| SessionCommand::SetAnswer { index, value, reply })
            .await?
    }

    pub async fn go_to(&self, index: usize) -> AppResult<usize> {
        self.navigate(NavTarget::Index(index)).await
    }

    pub async fn next(&self) -> AppResult<usize> {
        self.navigate(NavTarget::Next).await
    }

    pub async fn previous(&self) -> AppResult<usize> {
        self.navigate(NavTarget::Previous).await
    }

    async fn navigate(&self, target: NavTarget) -> AppResult<usize> {
        self.request(|reply| SessionCommand::Navigate { target, reply })
            .await
    }

    /// Manual submission. Asks for confirmation first unless the deadline
    /// has already passed; `Ok(None)` means the learner declined.
    pub async fn submit(&self) -> AppResult<Option<GradedResult>> {
        let snapshot = self.snapshot().await?;
        if snapshot.state.is_submission_locked() {
            return Err(AppError::AlreadySubmitting);
        }

        if snapshot.timer != TimerState::Expired {
            let summary = SubmitSummary {
                answered: snapshot.progress.answered,
                total: snapshot.progress.total,
                remaining_seconds: snapshot.remaining_seconds,
            };
            if !self.confirmation.confirm_submission(&summary).await {
                log::info!("Session {} submission declined", self.session_id);
                return Ok(None);
            }
        }

        self.request(SessionCommand::Submit).await?.map(Some)
    }

    pub async fn cancel(&self) -> AppResult<()> {
        self.request(SessionCommand::Cancel).await
    }

    /// Waits for the session to reach its outcome.
    pub async fn outcome(self) -> SessionOutcome {
        let QuizSession {
            session_id,
            commands,
            task,
            ..
        } = self;

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("Session {} task failed: {}", session_id, err);
                SessionOutcome::Aborted(err.to_string())
            }
        };
        drop(commands);
        outcome
    }
}

struct InFlight {
    task: JoinHandle<AppResult<GradedResult>>,
    reply: Option<oneshot::Sender<AppResult<GradedResult>>>,
}

/// Event loop owning the attempt. Timer ticks, learner commands and
/// submission results are handled one at a time.
struct SessionActor {
    session_id: Uuid,
    course_id: Option<String>,
    store: AttemptStore,
    navigator: QuestionNavigator,
    timer: Option<CountdownTimer>,
    in_flight: Option<InFlight>,
    grading: Arc<dyn GradingClient>,
    notifier: Arc<dyn Notifier>,
    routes: Arc<dyn RouteHandoff>,
}

impl SessionActor {
    async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> SessionOutcome {
        loop {
            let flow = tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => ControlFlow::Break(self.cancel("Quiz session closed")),
                },
                Some(_) = next_tick(&mut self.timer) => self.handle_tick(),
                joined = wait_for_submission(&mut self.in_flight) => self.handle_submission(joined),
            };

            if let ControlFlow::Break(outcome) = flow {
                log::info!(
                    "Session {} finished attempt {}: {}",
                    self.session_id,
                    self.store.attempt().id,
                    outcome.label()
                );
                return outcome;
            }
        }
    }

    fn handle_command(&mut self, command: SessionCommand) -> ControlFlow<SessionOutcome> {
        match command {
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            SessionCommand::CurrentQuestion(reply) => {
                let _ = reply.send(self.current_question());
            }
            SessionCommand::SetAnswer { index, value, reply } => {
                let _ = reply.send(self.store.set_answer(index, value));
            }
            SessionCommand::Navigate { target, reply } => {
                let index = match target {
                    NavTarget::Index(index) => self.navigator.go_to(index),
                    NavTarget::Next => self.navigator.next(),
                    NavTarget::Previous => self.navigator.previous(),
                };
                let _ = reply.send(index);
            }
            SessionCommand::Submit(reply) => {
                self.begin_submission(SubmitOrigin::Manual, Some(reply));
            }
            SessionCommand::Cancel(reply) => {
                let outcome = self.cancel("Quiz cancelled");
                let _ = reply.send(());
                return ControlFlow::Break(outcome);
            }
        }
        ControlFlow::Continue(())
    }

    fn handle_tick(&mut self) -> ControlFlow<SessionOutcome> {
        let current = self.navigator.current();
        let accepting = !self.store.is_locked();

        match self.store.tick_countdown() {
            TickOutcome::Ignored => {}
            TickOutcome::Running(remaining) => {
                if accepting {
                    self.store.credit_time(current, 1);
                }
                if remaining == LOW_TIME_WARNING_SECS {
                    self.notifier
                        .notify(NoticeLevel::Warning, "One minute remaining.");
                }
            }
            TickOutcome::Expired => {
                if accepting {
                    self.store.credit_time(current, 1);
                }
                self.timer = None;
                log::info!("Session {} ran out of time", self.session_id);
                self.notifier.notify(
                    NoticeLevel::Warning,
                    "Time is up! Submitting your answers...",
                );
                self.begin_submission(SubmitOrigin::Auto, None);
            }
        }
        ControlFlow::Continue(())
    }

    fn begin_submission(
        &mut self,
        origin: SubmitOrigin,
        reply: Option<oneshot::Sender<AppResult<GradedResult>>>,
    ) {
        let request = match SubmissionCoordinator::begin(&mut self.store, origin) {
            Ok(request) => request,
            Err(err) => {
                log::debug!(
                    "Session {} rejected {} submission: {}",
                    self.session_id,
                    origin,
                    err
                );
                respond(reply, Err(err));
                return;
            }
        };

        log::info!(
            "Session {} submitting attempt {} ({}, {} seconds elapsed)",
            self.session_id,
            request.attempt_id,
            origin,
            request.time_spent
        );

        let grading = Arc::clone(&self.grading);
        let question_count = self.store.quiz().question_count();
        let task = tokio::spawn(async move {
            SubmissionCoordinator::send(grading.as_ref(), request, question_count).await
        });

        self.in_flight = Some(InFlight { task, reply });
    }

    fn handle_submission(
        &mut self,
        joined: Result<AppResult<GradedResult>, JoinError>,
    ) -> ControlFlow<SessionOutcome> {
        let Some(in_flight) = self.in_flight.take() else {
            return ControlFlow::Continue(());
        };

        let outcome = joined
            .unwrap_or_else(|err| Err(AppError::Network(format!("Submission task failed: {}", err))));
        let settlement = SubmissionCoordinator::finish(&mut self.store, &outcome);

        match (settlement, outcome) {
            (Settlement::Graded, Ok(result)) => {
                self.timer = None;
                let quiz = self.store.quiz();
                let handoff = ResultsHandoff {
                    result: result.clone(),
                    quiz_title: quiz.title.clone(),
                    course_id: self.course_id.clone(),
                    questions: quiz.questions.clone(),
                };

                self.notifier.notify(
                    NoticeLevel::Info,
                    &format!("Quiz submitted. You scored {:.0}%.", result.percentage),
                );
                self.routes.show_results(&handoff);
                respond(in_flight.reply, Ok(result));
                ControlFlow::Break(SessionOutcome::Completed(Box::new(handoff)))
            }
            (Settlement::AlreadySubmitted, Err(err)) => {
                self.timer = None;
                let message = err.user_message();
                self.notifier.notify(NoticeLevel::Info, &message);
                self.routes.return_to_courses(&message);
                respond(in_flight.reply, Err(err));
                ControlFlow::Break(SessionOutcome::AlreadySubmitted)
            }
            (Settlement::Fatal, Err(err)) => {
                self.timer = None;
                log::error!(
                    "Session {} received an unusable grading result: {}",
                    self.session_id,
                    err
                );
                let message = err.user_message();
                self.notifier.notify(NoticeLevel::Error, &message);
                self.routes.return_to_courses(&message);
                let reason = err.to_string();
                respond(in_flight.reply, Err(err));
                ControlFlow::Break(SessionOutcome::Aborted(reason))
            }
            (Settlement::Retryable(origin), Err(err)) => {
                let message = match origin {
                    SubmitOrigin::Auto => format!(
                        "Automatic submission failed. {} Submit again to retry.",
                        err.user_message()
                    ),
                    SubmitOrigin::Manual => format!("Submission failed. {}", err.user_message()),
                };
                self.notifier.notify(NoticeLevel::Error, &message);
                respond(in_flight.reply, Err(err));
                ControlFlow::Continue(())
            }
            (_, outcome) => {
                respond(in_flight.reply, outcome);
                ControlFlow::Continue(())
            }
        }
    }

    /// Stops the timer and drops the attempt. A submission still in flight is
    /// aborted and whatever it would have returned is ignored.
    fn cancel(&mut self, reason: &str) -> SessionOutcome {
        self.timer = None;
        self.store.stop_countdown();

        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
            respond(in_flight.reply, Err(AppError::SessionClosed));
            log::info!(
                "Session {} abandoned an in-flight submission",
                self.session_id
            );
        }

        self.notifier.notify(
            NoticeLevel::Info,
            "Quiz cancelled. Your answers were not submitted.",
        );
        self.routes.return_to_courses(reason);
        SessionOutcome::Cancelled
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            attempt_id: self.store.attempt().id.clone(),
            quiz_title: self.store.quiz().title.clone(),
            current_index: self.navigator.current(),
            remaining_seconds: self.store.countdown().remaining_seconds(),
            timer: self.store.countdown().state(),
            state: self.store.state(),
            progress: self.navigator.progress(&self.store),
            answered: (0..self.store.answers().len())
                .map(|index| self.store.is_answered(index))
                .collect(),
        }
    }

    fn current_question(&self) -> CurrentQuestion {
        let index = self.navigator.current();
        CurrentQuestion {
            index,
            total: self.navigator.total(),
            question: self.store.quiz().questions[index].clone(),
            answer: self.store.answers()[index].value.clone(),
        }
    }
}

fn respond<T>(reply: Option<oneshot::Sender<T>>, value: T) {
    if let Some(reply) = reply {
        let _ = reply.send(value);
    }
}

async fn next_tick(timer: &mut Option<CountdownTimer>) -> Option<Instant> {
    match timer {
        Some(timer) => timer.next_tick().await,
        None => std::future::pending().await,
    }
}

async fn wait_for_submission(
    in_flight: &mut Option<InFlight>,
) -> Result<AppResult<GradedResult>, JoinError> {
    match in_flight {
        Some(in_flight) => (&mut in_flight.task).await,
        None => std::future::pending().await,
    }
}
