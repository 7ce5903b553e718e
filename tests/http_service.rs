use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{Form, Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use video_quiz::models::{Answers, ScoreSource};
use video_quiz::protocol::VerifyRequest;
use video_quiz::service::{self, GenerationParams, normalize};
use video_quiz::{GenerationError, HttpQuizService, QuizService, ScoringError, VideoUrl};

async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn client(base_url: &str) -> HttpQuizService {
    HttpQuizService::new(base_url, Duration::from_secs(2)).unwrap()
}

fn video() -> VideoUrl {
    VideoUrl::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap()
}

async fn generate(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    assert_eq!(
        form.get("youtube_url").map(String::as_str),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    );
    Json(json!({
        "title": format!("Quiz ({})", form["difficulty"]),
        "transcript": "...",
        "quiz": [
            {
                "question": "What does the borrow checker enforce?",
                "options": ["Aliasing rules", "Indentation", "Naming"],
                "correctAnswer": 0,
                "explanation": "It enforces aliasing XOR mutability."
            },
            {
                "question": "Which keyword makes a binding mutable?",
                "options": ["let", "mut", "ref"],
                "correctAnswer": "mut"
            },
            { "question": "Broken question", "options": ["only one"] }
        ]
    }))
}

#[tokio::test]
async fn test_generate_quiz_over_http() {
    let base = spawn_server(Router::new().route("/youtube_link/", post(generate))).await;
    let params = GenerationParams::default();

    let quiz = client(&base).generate_quiz(&video(), &params).await.unwrap();

    assert_eq!(quiz.title(), "Quiz (medium)");
    assert_eq!(quiz.len(), 2);
    assert_eq!(quiz.questions()[1].correct_option, 1);
    assert_eq!(quiz.questions()[1].explanation, "");
}

#[tokio::test]
async fn test_empty_quiz_fails_closed() {
    let app = Router::new().route(
        "/youtube_link/",
        post(|| async { Json(json!({ "quiz": [] })) }),
    );
    let base = spawn_server(app).await;

    let err = client(&base)
        .generate_quiz(&video(), &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::NoQuestions));
}

#[tokio::test]
async fn test_server_error_status() {
    let app = Router::new().route(
        "/youtube_link/",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "transcript unavailable") }),
    );
    let base = spawn_server(app).await;

    let err = client(&base)
        .generate_quiz(&video(), &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Status { status: 500 }));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let app = Router::new().route(
        "/youtube_link/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!({ "quiz": [] }))
        }),
    );
    let base = spawn_server(app).await;
    let service = client(&base);
    let deadline = Duration::from_millis(200);

    let err = service::generate_with_deadline(
        &service,
        &video(),
        &GenerationParams::default(),
        deadline,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GenerationError::TimedOut(d) if d == deadline));
}

#[tokio::test]
async fn test_unreachable_service() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .generate_quiz(&video(), &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)));
}

async fn verify(Json(request): Json<VerifyRequest>) -> Json<Value> {
    let details: Vec<Value> = request
        .quiz
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = request.user_answers.get(&i.to_string()).copied();
            json!({
                "question": q.question,
                "userAnswer": answer.map(|a| q.options[a].clone()),
                "correctAnswer": q.options[q.correct_answer],
                "isCorrect": answer == Some(q.correct_answer),
                "explanation": q.explanation,
            })
        })
        .collect();
    let score = details.iter().filter(|d| d["isCorrect"] == true).count();
    let total = request.quiz.len();
    Json(json!({
        "details": details,
        "score": score,
        "total": total,
        "percentage": score as f64 * 100.0 / total as f64,
    }))
}

fn three_question_quiz() -> video_quiz::Quiz {
    normalize::parse_response(
        r#"{"quiz": [
            {"question": "a?", "options": ["x", "y"], "correctAnswer": 0},
            {"question": "b?", "options": ["x", "y"], "correctAnswer": 1},
            {"question": "c?", "options": ["x", "y"], "correctAnswer": 1}
        ]}"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_verify_answers_over_http() {
    let base = spawn_server(Router::new().route("/verify_answers", post(verify))).await;
    let quiz = three_question_quiz();
    let mut answers = Answers::new();
    answers.insert(quiz.questions()[0].id, 0);
    answers.insert(quiz.questions()[1].id, 0);

    let report = client(&base).verify_answers(&quiz, &answers).await.unwrap();

    assert_eq!(report.source, ScoreSource::Remote);
    assert_eq!(report.correct_count, 1);
    assert_eq!(report.total_count, 3);
    assert_eq!(report.percentage, 33);
    assert_eq!(report.details[1].selected.as_deref(), Some("x"));
    assert_eq!(report.details[2].selected_label(), "No answer");
    assert_eq!(report.details[2].correct_answer, "y");
}

#[tokio::test]
async fn test_verify_rejects_report_for_another_quiz() {
    let app = Router::new().route(
        "/verify_answers",
        post(|| async {
            Json(json!({ "details": [], "score": 0, "total": 1, "percentage": 0.0 }))
        }),
    );
    let base = spawn_server(app).await;

    let err = client(&base)
        .verify_answers(&three_question_quiz(), &Answers::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::Inconsistent { .. }));
}

#[tokio::test]
async fn test_missing_verify_endpoint_is_unavailable() {
    let base = spawn_server(Router::new()).await;

    let err = client(&base)
        .verify_answers(&three_question_quiz(), &Answers::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::Unavailable { .. }));
}
