//! The quiz session controller.
//!
//! A [`QuizSession`] moves through three phases:
//!
//! ```text
//!   Input --generated--> Active --submit / time up--> Report
//!     ^                    |  ^                          |
//!     |                    |  +--------- retake ---------+
//!     +---- start over ----+-----------------------------+
//! ```
//!
//! The session never does IO itself. Work that completes later (quiz
//! generation, answer verification, countdown ticks) reports back as a
//! [`SessionEvent`] that the owner feeds into the matching session method.
//! Each event carries the request or attempt it belongs to, and events for
//! anything other than the current one are ignored.

mod machine;
mod timer;

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{GenerationError, ScoringError};
use crate::models::{Quiz, ScoreReport};

pub use machine::{
    Completion, GenerationRequest, QuizSession, SubmitReason, Submission, TickOutcome,
    VerificationRequest,
};
pub use timer::Countdown;

/// Default quiz length in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 600;

/// Macro-state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    Active,
    Report,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Input => "input",
            Phase::Active => "quiz",
            Phase::Report => "report",
        })
    }
}

/// Identifies one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub(crate) u64);

/// Identifies one pass through the Active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(pub(crate) u64);

/// Which path produces the score report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Score on this machine.
    #[default]
    Local,
    /// Ask the verification service, falling back to local on failure.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub duration_secs: u32,
    pub scoring: ScoringMode,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            scoring: ScoringMode::Local,
        }
    }
}

/// Completions delivered back to the session's owner.
#[derive(Debug)]
pub enum SessionEvent {
    Tick {
        attempt: AttemptId,
    },
    Generated {
        request: RequestId,
        result: Result<Quiz, GenerationError>,
    },
    Verified {
        attempt: AttemptId,
        result: Result<ScoreReport, ScoringError>,
    },
}
