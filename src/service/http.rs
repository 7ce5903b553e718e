//! Client for the quiz service HTTP API.
//!
//! Generation posts the link as a form to `/youtube_link/`; verification posts
//! the quiz and the answers as JSON to `/verify_answers`. Calls are
//! instrumented with the endpoint and latency, never with response contents.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{info, instrument, warn};

use crate::error::{GenerationError, ScoringError};
use crate::models::{Answers, QuestionOutcome, Quiz, ScoreReport, ScoreSource};
use crate::protocol::{GenerateForm, VerifyRequest, VerifyResponse, WireQuestion};
use crate::validate::VideoUrl;

use super::normalize;
use super::{GenerationParams, QuizService};

const GENERATE_PATH: &str = "youtube_link/";
const VERIFY_PATH: &str = "verify_answers";
const CLIENT_AGENT: &str = concat!("video-quiz/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpQuizService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuizService {
    /// Builds a client for the service at `base_url`.
    ///
    /// Only connecting is bounded here; the overall wait is bounded by the
    /// caller (see [`super::generate_with_deadline`]).
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl QuizService for HttpQuizService {
    #[instrument(level = "info", skip_all, fields(video = %video, difficulty = %params.difficulty))]
    async fn generate_quiz(
        &self,
        video: &VideoUrl,
        params: &GenerationParams,
    ) -> Result<Quiz, GenerationError> {
        let started = Instant::now();
        let form = GenerateForm {
            youtube_url: video.as_str(),
            target_lang: &params.target_lang,
            difficulty: params.difficulty.as_str(),
        };

        let response = self
            .client
            .post(self.endpoint(GENERATE_PATH))
            .header(USER_AGENT, CLIENT_AGENT)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(GenerationError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "generation request rejected");
            return Err(GenerationError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(GenerationError::Transport)?;
        let quiz = normalize::parse_response(&body)?;

        info!(
            questions = quiz.len(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "quiz generated"
        );
        Ok(quiz)
    }

    #[instrument(level = "info", skip_all, fields(questions = quiz.len(), answered = answers.len()))]
    async fn verify_answers(
        &self,
        quiz: &Quiz,
        answers: &Answers,
    ) -> Result<ScoreReport, ScoringError> {
        let started = Instant::now();
        let request = verify_request(quiz, answers);

        let response = self
            .client
            .post(self.endpoint(VERIFY_PATH))
            .header(USER_AGENT, CLIENT_AGENT)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoringError::Unavailable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Unavailable {
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let body: VerifyResponse = response.json().await.map_err(|e| ScoringError::Inconsistent {
            reason: e.to_string(),
        })?;
        let report = report_from_response(quiz, body)?;

        info!(
            correct = report.correct_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "answers verified"
        );
        Ok(report)
    }
}

fn verify_request(quiz: &Quiz, answers: &Answers) -> VerifyRequest {
    let mut user_answers = std::collections::BTreeMap::new();
    let questions = quiz
        .questions()
        .iter()
        .enumerate()
        .map(|(position, question)| {
            if let Some(answer) = answers.get(&question.id) {
                user_answers.insert(position.to_string(), *answer);
            }
            WireQuestion {
                question: question.prompt.clone(),
                options: question.options.clone(),
                correct_answer: question.correct_option,
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    VerifyRequest {
        quiz: questions,
        user_answers,
    }
}

/// Accepts a verification response only if it covers exactly this quiz.
fn report_from_response(quiz: &Quiz, body: VerifyResponse) -> Result<ScoreReport, ScoringError> {
    if body.total != quiz.len() || body.details.len() != quiz.len() {
        return Err(ScoringError::Inconsistent {
            reason: format!(
                "expected {} questions, got total {} with {} details",
                quiz.len(),
                body.total,
                body.details.len()
            ),
        });
    }

    let details: Vec<QuestionOutcome> = body
        .details
        .into_iter()
        .zip(quiz.questions())
        .map(|(detail, question)| QuestionOutcome {
            prompt: if detail.question.is_empty() {
                question.prompt.clone()
            } else {
                detail.question
            },
            selected: detail.user_answer,
            correct_answer: if detail.correct_answer.is_empty() {
                question.correct_text().to_string()
            } else {
                detail.correct_answer
            },
            is_correct: detail.is_correct,
            explanation: detail.explanation,
        })
        .collect();

    let report = ScoreReport::from_outcomes(details, ScoreSource::Remote);
    if report.correct_count != body.score {
        return Err(ScoringError::Inconsistent {
            reason: format!(
                "score {} does not match {} correct details",
                body.score, report.correct_count
            ),
        });
    }
    Ok(report)
}
