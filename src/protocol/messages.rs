//! Wire shapes of the quiz service HTTP API.
//!
//! Generation responses are deliberately loose (`serde_json::Value`) because
//! the service builds them from model output; `service::normalize` turns them
//! into a [`crate::models::Quiz`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Form fields of `POST /youtube_link/`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateForm<'a> {
    pub youtube_url: &'a str,
    pub target_lang: &'a str,
    pub difficulty: &'a str,
}

/// Body returned by the generation endpoints. Other fields the service sends
/// (transcript, summary) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quiz: serde_json::Value,
}

/// One question as the service expects it back for verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

/// Body of `POST /verify_answers`. Answer keys are question positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub quiz: Vec<WireQuestion>,
    pub user_answers: BTreeMap<String, usize>,
}

/// Per-question entry of a verification response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDetail {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_answer: Option<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub details: Vec<VerifyDetail>,
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_request_uses_service_field_names() {
        let request = VerifyRequest {
            quiz: vec![WireQuestion {
                question: "2 + 2?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
                correct_answer: 1,
                explanation: String::new(),
            }],
            user_answers: [("0".to_string(), 1)].into_iter().collect(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["quiz"][0]["correctAnswer"], 1);
        assert_eq!(json["user_answers"]["0"], 1);
    }

    #[test]
    fn test_verify_response_tolerates_missing_detail_fields() {
        let body = r#"{
            "details": [{"question": "2 + 2?", "isCorrect": true}],
            "score": 1, "total": 1, "percentage": 100
        }"#;
        let response: VerifyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.details[0].user_answer, None);
        assert!(response.details[0].is_correct);
        assert_eq!(response.percentage, 100.0);
    }

    #[test]
    fn test_generate_response_ignores_extra_fields() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"transcript": "hi", "summary": ["a"]}"#).unwrap();
        assert!(response.title.is_none());
        assert!(response.quiz.is_null());
    }
}
