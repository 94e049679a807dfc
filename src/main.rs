use std::sync::Arc;

use async_trait::async_trait;
use tokio::{
    io::{self, AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::{Mutex, Notify},
};

use quiz_session::{
    app_state::AppState,
    clients::{ResultsHandoff, RouteHandoff, SubmitConfirmation, SubmitSummary},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{AnswerValue, QuizQuestionType},
    services::{CurrentQuestion, QuizSession, ResultsPresenter},
};

type Input = Arc<Mutex<Lines<BufReader<Stdin>>>>;

const HELP: &str = "Commands: n (next), p (previous), g N (go to question), a VALUE (answer), s (submit), status, q (quit)";

/// Prints the results report, or the reason for leaving, and wakes the input loop.
struct TerminalRoutes {
    finished: Arc<Notify>,
}

impl RouteHandoff for TerminalRoutes {
    fn show_results(&self, handoff: &ResultsHandoff) {
        let report = ResultsPresenter::present(&handoff.result, &handoff.questions);
        println!("\n=== {} ===", handoff.quiz_title);
        print!("{}", report);
        self.finished.notify_one();
    }

    fn return_to_courses(&self, reason: &str) {
        println!("\nReturning to your courses: {}", reason);
        self.finished.notify_one();
    }
}

struct StdinConfirmation {
    input: Input,
}

#[async_trait]
impl SubmitConfirmation for StdinConfirmation {
    async fn confirm_submission(&self, summary: &SubmitSummary) -> bool {
        println!(
            "{} ({} seconds left) [y/N]",
            summary.prompt(),
            summary.remaining_seconds
        );
        match self.input.lock().await.next_line().await {
            Ok(Some(line)) => matches!(line.trim(), "y" | "Y" | "yes"),
            _ => false,
        }
    }
}

fn print_question(current: &CurrentQuestion) {
    let question = &current.question;
    println!(
        "\nQuestion {}/{} ({} point(s))",
        current.index + 1,
        current.total,
        question.points
    );
    println!("{}", question.text);
    match question.question_type {
        QuizQuestionType::SingleChoice => {
            for (index, option) in question.options.iter().enumerate() {
                let marker = if current.answer == AnswerValue::Choice(index) {
                    "*"
                } else {
                    " "
                };
                println!(" {} {}. {}", marker, index + 1, option);
            }
        }
        QuizQuestionType::TrueFalse => {
            let selected = match &current.answer {
                AnswerValue::Literal(value) => value.as_str(),
                _ => "unanswered",
            };
            println!("  true / false (currently: {})", selected);
        }
    }
}

fn parse_answer(current: &CurrentQuestion, raw: &str) -> AppResult<AnswerValue> {
    match current.question.question_type {
        QuizQuestionType::SingleChoice => raw
            .parse::<usize>()
            .ok()
            .and_then(|choice| choice.checked_sub(1))
            .filter(|index| *index < current.question.options.len())
            .map(AnswerValue::Choice)
            .ok_or_else(|| {
                AppError::Invalid(format!(
                    "Pick an option between 1 and {}",
                    current.question.options.len()
                ))
            }),
        QuizQuestionType::TrueFalse => match raw.to_ascii_lowercase().as_str() {
            "t" | "true" => Ok(AnswerValue::from(true)),
            "f" | "false" => Ok(AnswerValue::from(false)),
            _ => Err(AppError::Invalid("Answer true or false".to_string())),
        },
    }
}

async fn handle_line(session: &QuizSession, line: &str) -> AppResult<bool> {
    let mut parts = line.trim().splitn(2, ' ');
    let command = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "" => {}
        "n" => {
            session.next().await?;
            print_question(&session.current_question().await?);
        }
        "p" => {
            session.previous().await?;
            print_question(&session.current_question().await?);
        }
        "g" => {
            let number: usize = argument
                .parse()
                .map_err(|_| AppError::Invalid("Usage: g N".to_string()))?;
            session.go_to(number.saturating_sub(1)).await?;
            print_question(&session.current_question().await?);
        }
        "a" => {
            let current = session.current_question().await?;
            let value = parse_answer(&current, argument)?;
            if session.set_answer(current.index, value).await? {
                print_question(&session.current_question().await?);
            } else {
                println!("Answers can no longer be changed.");
            }
        }
        "s" => {
            if session.submit().await?.is_none() {
                println!("Submission cancelled, keep going.");
            }
        }
        "status" => {
            let snapshot = session.snapshot().await?;
            println!(
                "{}: question {}/{}, {} answered, {}s left ({})",
                snapshot.quiz_title,
                snapshot.current_index + 1,
                snapshot.progress.total,
                snapshot.progress.answered,
                snapshot.remaining_seconds,
                snapshot.state
            );
        }
        "q" => {
            session.cancel().await?;
            return Ok(false);
        }
        _ => println!("{}", HELP),
    }

    Ok(true)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let Some(quiz_id) = args.next() else {
        eprintln!("Usage: quiz-session <quiz-id> [course-id]");
        std::process::exit(2);
    };
    let course_id = args.next();

    let input: Input = Arc::new(Mutex::new(BufReader::new(io::stdin()).lines()));
    let finished = Arc::new(Notify::new());

    let state = AppState::new(
        Config::from_env(),
        Arc::new(TerminalRoutes {
            finished: finished.clone(),
        }),
        Arc::new(StdinConfirmation {
            input: input.clone(),
        }),
    )
    .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))?;

    let session = match QuizSession::start(&state, &quiz_id, course_id.as_deref()).await {
        Ok(session) => session,
        Err(err) => {
            log::error!("Could not start quiz {}: {}", quiz_id, err);
            std::process::exit(1);
        }
    };

    log::info!("Session {} ready", session.session_id());
    println!("{}", HELP);
    if let Ok(current) = session.current_question().await {
        print_question(&current);
    }

    loop {
        let line = tokio::select! {
            line = async { input.lock().await.next_line().await } => line?,
            _ = finished.notified() => break,
        };

        let Some(line) = line else {
            session.cancel().await.ok();
            break;
        };

        match handle_line(&session, &line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(AppError::SessionClosed) => break,
            Err(err) => println!("{}", err.user_message()),
        }
    }

    let outcome = session.outcome().await;
    log::info!("Quiz session ended: {:?}", outcome);
    Ok(())
}
