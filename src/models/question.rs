use std::collections::HashSet;

use thiserror::Error;

/// Identifier of a question, unique within one quiz.
pub type QuestionId = usize;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub explanation: String,
}

impl Question {
    /// Text of the option at `index`, if there is one.
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn correct_text(&self) -> &str {
        self.option(self.correct_option).unwrap_or_default()
    }

    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_option
    }
}

/// Reasons a set of questions cannot form a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizShapeError {
    #[error("a quiz needs at least one question")]
    NoQuestions,
    #[error("question {id} has {count} options, at least 2 are required")]
    TooFewOptions { id: QuestionId, count: usize },
    #[error("question {id} marks option {index} as correct but only has {len} options")]
    CorrectOptionOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },
    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),
}

/// A validated, non-empty quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    title: String,
    questions: Vec<Question>,
}

impl Quiz {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Result<Self, QuizShapeError> {
        if questions.is_empty() {
            return Err(QuizShapeError::NoQuestions);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(QuizShapeError::DuplicateId(question.id));
            }
            if question.options.len() < 2 {
                return Err(QuizShapeError::TooFewOptions {
                    id: question.id,
                    count: question.options.len(),
                });
            }
            if question.correct_option >= question.options.len() {
                return Err(QuizShapeError::CorrectOptionOutOfRange {
                    id: question.id,
                    index: question.correct_option,
                    len: question.options.len(),
                });
            }
        }

        Ok(Self {
            title: title.into(),
            questions,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: QuestionId, options: &[&str], correct_option: usize) -> Question {
        Question {
            id,
            prompt: format!("Question {}", id + 1),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_option,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_quiz_requires_questions() {
        assert_eq!(
            Quiz::new("Empty", Vec::new()),
            Err(QuizShapeError::NoQuestions)
        );
    }

    #[test]
    fn test_quiz_rejects_malformed_questions() {
        let err = Quiz::new("q", vec![question(0, &["only"], 0)]).unwrap_err();
        assert_eq!(err, QuizShapeError::TooFewOptions { id: 0, count: 1 });

        let err = Quiz::new("q", vec![question(0, &["a", "b"], 2)]).unwrap_err();
        assert_eq!(
            err,
            QuizShapeError::CorrectOptionOutOfRange {
                id: 0,
                index: 2,
                len: 2
            }
        );

        let err = Quiz::new(
            "q",
            vec![question(3, &["a", "b"], 0), question(3, &["c", "d"], 1)],
        )
        .unwrap_err();
        assert_eq!(err, QuizShapeError::DuplicateId(3));
    }

    #[test]
    fn test_question_lookups() {
        let q = question(0, &["useState", "useEffect"], 1);
        assert_eq!(q.option(0), Some("useState"));
        assert_eq!(q.option(5), None);
        assert_eq!(q.correct_text(), "useEffect");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));

        let quiz = Quiz::new("Hooks", vec![q]).unwrap();
        assert_eq!(quiz.title(), "Hooks");
        assert_eq!(quiz.len(), 1);
        assert!(!quiz.is_empty());
        assert!(quiz.question(1).is_none());
    }
}
