//! Quiz generation and answer verification services.

mod http;
mod local;
pub mod normalize;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{GenerationError, ScoringError};
use crate::models::{Answers, Quiz, ScoreReport};
use crate::validate::VideoUrl;

pub use http::HttpQuizService;
pub use local::{LocalQuizService, QuizSource};

/// How hard the generated questions should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Next level, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Difficulty::Basic => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Basic,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hints sent along with a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub target_lang: String,
    pub difficulty: Difficulty,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            target_lang: "en".to_string(),
            difficulty: Difficulty::default(),
        }
    }
}

/// External collaborator that produces quizzes and, optionally, scores them.
pub trait QuizService: Send + Sync + 'static {
    fn generate_quiz(
        &self,
        video: &VideoUrl,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<Quiz, GenerationError>> + Send;

    /// Remote scoring. Services without a verification endpoint report
    /// themselves unavailable, which makes the session score locally.
    fn verify_answers(
        &self,
        _quiz: &Quiz,
        _answers: &Answers,
    ) -> impl Future<Output = Result<ScoreReport, ScoringError>> + Send {
        async {
            Err(ScoringError::Unavailable {
                reason: "this quiz source has no verification endpoint".to_string(),
            })
        }
    }
}

/// Runs `generate_quiz` with an upper bound on the wait.
pub async fn generate_with_deadline<S: QuizService>(
    service: &S,
    video: &VideoUrl,
    params: &GenerationParams,
    deadline: Duration,
) -> Result<Quiz, GenerationError> {
    tokio::time::timeout(deadline, service.generate_quiz(video, params))
        .await
        .unwrap_or(Err(GenerationError::TimedOut(deadline)))
}

/// Runs `verify_answers` with an upper bound on the wait.
pub async fn verify_with_deadline<S: QuizService>(
    service: &S,
    quiz: &Quiz,
    answers: &Answers,
    deadline: Duration,
) -> Result<ScoreReport, ScoringError> {
    tokio::time::timeout(deadline, service.verify_answers(quiz, answers))
        .await
        .unwrap_or(Err(ScoringError::TimedOut(deadline)))
}
