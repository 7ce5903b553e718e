//! Turns loosely shaped generation responses into a strict [`Quiz`].

use serde_json::Value;
use tracing::warn;

use crate::error::GenerationError;
use crate::models::{Question, Quiz, QuizShapeError};
use crate::protocol::GenerateResponse;

pub const DEFAULT_TITLE: &str = "Generated Quiz";

/// Parses a generation response body.
pub fn parse_response(body: &str) -> Result<Quiz, GenerationError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    normalize(response)
}

/// Builds a quiz from a decoded response.
///
/// Missing fields get defaults (prompt `Question N`, no options, answer 0,
/// empty explanation). Questions still unusable after that are dropped.
/// Fails with [`GenerationError::NoQuestions`] when nothing usable is left.
pub fn normalize(response: GenerateResponse) -> Result<Quiz, GenerationError> {
    let raw_questions = match response.quiz {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            warn!(kind = json_kind(&other), "quiz field is not a list; treating as empty");
            Vec::new()
        }
    };

    let mut questions = Vec::with_capacity(raw_questions.len());
    for (position, raw) in raw_questions.iter().enumerate() {
        match normalize_question(position, raw) {
            Ok(mut question) => {
                question.id = questions.len();
                questions.push(question);
            }
            Err(reason) => warn!(position, reason, "dropping unusable question"),
        }
    }

    let title = response
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Quiz::new(title, questions).map_err(|e| match e {
        QuizShapeError::NoQuestions => GenerationError::NoQuestions,
        other => GenerationError::Malformed(other.to_string()),
    })
}

fn normalize_question(position: usize, raw: &Value) -> Result<Question, &'static str> {
    let Value::Object(fields) = raw else {
        return Err("not an object");
    };

    let prompt = fields
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Question {}", position + 1));

    let options: Vec<String> = match fields.get("options") {
        Some(Value::Array(items)) => items.iter().filter_map(option_text).collect(),
        _ => Vec::new(),
    };
    if options.len() < 2 {
        return Err("fewer than two options");
    }

    let correct_option = match fields.get("correctAnswer") {
        None | Some(Value::Null) => 0,
        Some(value) => resolve_answer(value, &options).ok_or("correct answer does not match an option")?,
    };
    if correct_option >= options.len() {
        return Err("correct answer index out of range");
    }

    let explanation = fields
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Question {
        id: position,
        prompt,
        options,
        correct_option,
        explanation,
    })
}

fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts an index, the text of one of the options, or a numeric string.
/// A string matching an option's text always resolves to that option, even
/// when it is also a number.
fn resolve_answer(value: &Value, options: &[String]) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|i| usize::try_from(i).ok()),
        Value::String(s) => {
            let s = s.trim();
            options
                .iter()
                .position(|o| o.trim() == s)
                .or_else(|| s.parse::<usize>().ok())
        }
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let body = r#"{
            "transcript": "...",
            "summary": [],
            "quiz": [
                {"options": ["yes", "no"]},
                {"question": "Pick one", "options": ["a", "b", "c"], "correctAnswer": 2, "explanation": "c is right"}
            ]
        }"#;

        let quiz = parse_response(body).unwrap();
        assert_eq!(quiz.title(), DEFAULT_TITLE);
        assert_eq!(quiz.len(), 2);

        let first = &quiz.questions()[0];
        assert_eq!(first.prompt, "Question 1");
        assert_eq!(first.correct_option, 0);
        assert_eq!(first.explanation, "");

        let second = &quiz.questions()[1];
        assert_eq!(second.id, 1);
        assert_eq!(second.correct_option, 2);
        assert_eq!(second.explanation, "c is right");
    }

    #[test]
    fn test_empty_quiz_fails_closed() {
        assert!(matches!(
            parse_response(r#"{"quiz": []}"#),
            Err(GenerationError::NoQuestions)
        ));
        assert!(matches!(
            parse_response(r#"{"transcript": "only text"}"#),
            Err(GenerationError::NoQuestions)
        ));
        assert!(matches!(
            parse_response(r#"{"quiz": "not a list"}"#),
            Err(GenerationError::NoQuestions)
        ));
    }

    #[test]
    fn test_drops_unusable_questions_and_renumbers() {
        let body = r#"{"quiz": [
            {"question": "no options"},
            "just a string",
            {"question": "bad index", "options": ["a", "b"], "correctAnswer": 7},
            {"question": "kept", "options": ["a", "b"], "correctAnswer": 1}
        ]}"#;

        let quiz = parse_response(body).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.questions()[0].prompt, "kept");
        assert_eq!(quiz.questions()[0].id, 0);
    }

    #[test]
    fn test_resolves_textual_correct_answers() {
        let body = r#"{"quiz": [
            {"question": "q1", "options": ["red", "green"], "correctAnswer": "green"},
            {"question": "q2", "options": ["red", "green"], "correctAnswer": "1"},
            {"question": "q3", "options": ["red", "green"], "correctAnswer": "blue"}
        ]}"#;

        let quiz = parse_response(body).unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.questions()[0].correct_option, 1);
        assert_eq!(quiz.questions()[1].correct_option, 1);
    }

    #[test]
    fn test_numeric_option_text_wins_over_index() {
        let body = r#"{"quiz": [
            {"question": "1 + 1?", "options": ["1", "2", "3"], "correctAnswer": "2"},
            {"question": "2 + 2?", "options": ["3", "4", "5", "6"], "correctAnswer": "4"},
            {"question": "3 - 2?", "options": ["4", "1"], "correctAnswer": "1"}
        ]}"#;

        let quiz = parse_response(body).unwrap();
        assert_eq!(quiz.len(), 3);
        assert_eq!(quiz.questions()[0].correct_text(), "2");
        assert_eq!(quiz.questions()[1].correct_text(), "4");
        assert_eq!(quiz.questions()[2].correct_text(), "1");
    }

    #[test]
    fn test_uses_title_when_present() {
        let body = r#"{"title": " React Hooks ", "quiz": [{"options": [1, 2]}]}"#;
        let quiz = parse_response(body).unwrap();
        assert_eq!(quiz.title(), "React Hooks");
        assert_eq!(quiz.questions()[0].options, vec!["1", "2"]);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            parse_response("<html>502</html>"),
            Err(GenerationError::Malformed(_))
        ));
    }
}
