use std::sync::Mutex;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde_json::{json, Value};

use quiz_session::{
    clients::{GradingClient, HttpGradingClient},
    config::Config,
    errors::AppError,
    models::{
        domain::{Answer, AnswerValue, SubmitOrigin},
        dto::SubmitAttemptRequest,
    },
};

type Received = web::Data<Mutex<Vec<Value>>>;

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer test-session-token")
}

async fn start(req: HttpRequest, path: web::Path<String>) -> impl Responder {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().json(json!({"error": "Missing token", "code": 401}));
    }

    match path.into_inner().as_str() {
        "quiz-locked" => {
            HttpResponse::Forbidden().json(json!({"error": "Not enrolled in course", "code": 403}))
        }
        "quiz-done" => {
            HttpResponse::Conflict().json(json!({"error": "Quiz already completed", "code": 409}))
        }
        "quiz-broken" => HttpResponse::Ok().json(json!({"data": {"attemptId": 7}})),
        quiz_id => HttpResponse::Ok().json(json!({
            "data": {
                "attemptId": "attempt-9",
                "quiz": {
                    "id": quiz_id,
                    "title": "Traits",
                    "timeLimitMinutes": 10,
                    "passingScore": 60,
                    "totalPoints": 2,
                    "questions": [
                        {
                            "id": "q-1",
                            "text": "Traits can have default methods",
                            "type": "true_false",
                            "points": 1
                        },
                        {
                            "id": "q-2",
                            "text": "Which keyword declares a trait?",
                            "type": "multiple_choice",
                            "options": ["impl", "trait", "dyn"],
                            "points": 1,
                            "explanation": "`trait` introduces a trait definition."
                        }
                    ]
                }
            },
            "message": "Attempt started"
        })),
    }
}

async fn submit(path: web::Path<String>, body: web::Json<Value>, received: Received) -> impl Responder {
    let body = body.into_inner();
    received.lock().unwrap().push(body.clone());

    match path.into_inner().as_str() {
        "attempt-done" => HttpResponse::Conflict()
            .json(json!({"error": "Attempt already submitted", "code": 409})),
        "attempt-crash" => HttpResponse::InternalServerError().body("upstream exploded"),
        _ => {
            let answers: Vec<Value> = body["answers"]
                .as_array()
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|answer| {
                    let is_correct = answer["answer"] == json!("true");
                    json!({
                        "questionId": answer["questionId"],
                        "userAnswer": answer["answer"],
                        "isCorrect": is_correct,
                        "pointsEarned": if is_correct { 1 } else { 0 },
                        "correctAnswer": "true"
                    })
                })
                .collect();
            let earned = answers.iter().filter(|a| a["isCorrect"] == json!(true)).count();
            let percentage = earned as f64 / answers.len().max(1) as f64 * 100.0;

            HttpResponse::Ok().json(json!({
                "data": {
                    "percentage": percentage,
                    "passed": percentage >= 60.0,
                    "pointsEarned": earned,
                    "totalPoints": answers.len(),
                    "passingScore": 60,
                    "answers": answers
                },
                "message": "Quiz submitted"
            }))
        }
    }
}

async fn spawn_backend() -> (String, Received) {
    let received: Received = web::Data::new(Mutex::new(Vec::new()));
    let data = received.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/api/quizzes/{quiz_id}/start", web::post().to(start))
            .route(
                "/api/quizzes/attempts/{attempt_id}/submit",
                web::post().to(submit),
            )
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());

    (format!("http://{}/api/", addr), received)
}

fn client_for(base_url: &str) -> HttpGradingClient {
    let config = Config {
        api_base_url: base_url.to_string(),
        ..Config::test_config()
    };
    HttpGradingClient::new(&config).unwrap()
}

fn submission(attempt_id: &str, origin: SubmitOrigin) -> SubmitAttemptRequest {
    let answers = vec![
        Answer {
            question_id: "q-1".to_string(),
            value: AnswerValue::from(true),
            time_spent_seconds: 12,
        },
        Answer::unanswered("q-2"),
    ];
    SubmitAttemptRequest::new(attempt_id, &answers, 45, origin)
}

#[actix_web::test]
async fn test_start_attempt_unwraps_envelope() {
    let (base_url, _) = spawn_backend().await;
    let client = client_for(&base_url);

    let started = client.start_attempt("quiz-traits").await.unwrap();

    assert_eq!(started.attempt_id, "attempt-9");
    assert_eq!(started.quiz.id, "quiz-traits");
    assert_eq!(started.quiz.time_limit_seconds(), 600);
    assert_eq!(started.quiz.questions[1].options.len(), 3);
    assert!(started.quiz.ensure_playable().is_ok());
}

#[actix_web::test]
async fn test_start_attempt_maps_error_statuses() {
    let (base_url, _) = spawn_backend().await;
    let client = client_for(&base_url);

    assert_eq!(
        client.start_attempt("quiz-locked").await.unwrap_err(),
        AppError::NotEnrolled("Not enrolled in course".to_string())
    );
    assert!(matches!(
        client.start_attempt("quiz-done").await,
        Err(AppError::AlreadyCompleted(_))
    ));
    assert!(matches!(
        client.start_attempt("quiz-broken").await,
        Err(AppError::Invalid(_))
    ));
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let (base_url, _) = spawn_backend().await;
    let config = Config {
        api_base_url: base_url,
        auth_token: "someone-else".to_string().into(),
        ..Config::test_config()
    };
    let client = HttpGradingClient::new(&config).unwrap();

    assert!(matches!(
        client.start_attempt("quiz-traits").await,
        Err(AppError::Unauthorized(_))
    ));
}

#[actix_web::test]
async fn test_submit_attempt_sends_camel_case_body() {
    let (base_url, received) = spawn_backend().await;
    let client = client_for(&base_url);

    let result = client
        .submit_attempt(submission("attempt-9", SubmitOrigin::Auto))
        .await
        .unwrap();

    assert_eq!(result.percentage, 50.0);
    assert!(!result.passed);
    assert_eq!(result.answers.len(), 2);

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "answers": [
                {"questionId": "q-1", "answer": "true", "timeSpent": 12},
                {"questionId": "q-2", "answer": null, "timeSpent": 0}
            ],
            "timeSpent": 45,
            "autoSubmitted": true
        })
    );
}

#[actix_web::test]
async fn test_submit_attempt_maps_conflict_and_server_errors() {
    let (base_url, _) = spawn_backend().await;
    let client = client_for(&base_url);

    let duplicate = client
        .submit_attempt(submission("attempt-done", SubmitOrigin::Manual))
        .await;
    assert_eq!(
        duplicate,
        Err(AppError::AlreadySubmitted("Attempt already submitted".to_string()))
    );

    let crashed = client
        .submit_attempt(submission("attempt-crash", SubmitOrigin::Manual))
        .await;
    assert!(matches!(&crashed, Err(AppError::Network(msg)) if msg.contains("500")));
    assert!(crashed.unwrap_err().is_retryable());
}

#[actix_web::test]
async fn test_unreachable_backend_is_network_error() {
    let client = client_for("http://127.0.0.1:9/api");

    let result = client.start_attempt("quiz-traits").await;

    assert!(matches!(result, Err(AppError::Network(_))));
}
