//! Local scoring of a finished attempt.

use crate::models::{Answers, Question, QuestionOutcome, ScoreReport, ScoreSource};

/// Scores `answers` against `questions`.
///
/// A question without an entry in `answers` is incorrect and reported as
/// unanswered. An answer index the question has no option for is treated the
/// same way. The result depends only on the inputs.
pub fn score(questions: &[Question], answers: &Answers) -> ScoreReport {
    let details = questions
        .iter()
        .map(|question| {
            let answer = answers.get(&question.id).copied();
            let selected = answer.and_then(|index| question.option(index)).map(str::to_string);
            let is_correct = selected.is_some() && answer.is_some_and(|a| question.is_correct(a));

            QuestionOutcome {
                prompt: question.prompt.clone(),
                selected,
                correct_answer: question.correct_text().to_string(),
                is_correct,
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    ScoreReport::from_outcomes(details, ScoreSource::Local)
}
