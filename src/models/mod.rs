//! Quiz domain types.

mod question;
mod report;

use std::collections::BTreeMap;

pub use question::{Question, QuestionId, Quiz, QuizShapeError};
pub use report::{NO_ANSWER, QuestionOutcome, ScoreReport, ScoreSource, percentage};

/// Selected option index per question.
pub type Answers = BTreeMap<QuestionId, usize>;
