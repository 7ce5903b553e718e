//! Error types shared across the crate.
//!
//! Every recoverable error here renders as a sentence a user can read in the
//! notification bar; nothing in this module is fatal to the process except
//! [`AppError`], which only surfaces from startup and terminal IO.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::session::Phase;

/// Rejections from the video link validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter a YouTube URL")]
    Empty,
    #[error("Please enter a valid YouTube URL")]
    InvalidUrl { input: String },
}

/// Failures while asking the quiz service for a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("Could not reach the quiz service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("The quiz service answered with HTTP {status}")]
    Status { status: u16 },
    #[error("The quiz service did not answer within {} seconds", .0.as_secs())]
    TimedOut(Duration),
    #[error("The quiz service sent a response that could not be read: {0}")]
    Malformed(String),
    #[error("No quiz questions were generated for this video")]
    NoQuestions,
    #[error("Could not read quiz file {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of the answer verification service. The session always falls
/// back to local scoring after one of these.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("Answer verification is unavailable ({reason}); showing the local score")]
    Unavailable { reason: String },
    #[error("Answer verification timed out after {} seconds; showing the local score", .0.as_secs())]
    TimedOut(Duration),
    #[error("Answer verification returned an inconsistent report ({reason}); showing the local score")]
    Inconsistent { reason: String },
}

/// Commands the session refused in its current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("A quiz is already being generated, please wait")]
    GenerationPending,
    #[error("That action is not available on the {actual} screen")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("There is no question {} in this quiz", .index + 1)]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("Question {} has no option {}", .question + 1, .index + 1)]
    OptionOutOfRange {
        question: usize,
        index: usize,
        len: usize,
    },
    #[error("Answer all questions before submitting ({remaining} left)")]
    Unanswered { remaining: usize },
}

/// Errors that end the program.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not set up logging: {0}")]
    Telemetry(String),
    #[error("could not create the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
