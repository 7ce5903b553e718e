//! Offline quiz source: a saved generation response on disk, or the bundled
//! demo quiz.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::GenerationError;
use crate::models::Quiz;
use crate::validate::VideoUrl;

use super::normalize;
use super::{GenerationParams, QuizService};

const DEMO_QUIZ: &str = include_str!("../../demos/ownership.json");

/// Where a [`LocalQuizService`] reads its quiz from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSource {
    /// The demo quiz compiled into the binary.
    Bundled,
    /// A JSON file in the same shape the generation endpoint returns.
    File(PathBuf),
}

/// Serves the same quiz for every link. Useful without a running quiz
/// service and for replaying a saved response.
#[derive(Debug, Clone)]
pub struct LocalQuizService {
    source: QuizSource,
}

impl LocalQuizService {
    pub fn new(source: QuizSource) -> Self {
        Self { source }
    }

    pub fn bundled() -> Self {
        Self::new(QuizSource::Bundled)
    }

    pub fn source(&self) -> &QuizSource {
        &self.source
    }

    async fn read_source(&self) -> Result<String, GenerationError> {
        match &self.source {
            QuizSource::Bundled => Ok(DEMO_QUIZ.to_string()),
            QuizSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| GenerationError::File {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

impl QuizService for LocalQuizService {
    async fn generate_quiz(
        &self,
        video: &VideoUrl,
        params: &GenerationParams,
    ) -> Result<Quiz, GenerationError> {
        debug!(%video, difficulty = %params.difficulty, source = ?self.source, "serving local quiz");
        let body = self.read_source().await?;
        let quiz = normalize::parse_response(&body)?;
        info!(questions = quiz.len(), title = quiz.title(), "loaded local quiz");
        Ok(quiz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> VideoUrl {
        VideoUrl::parse("https://www.youtube.com/watch?v=demo").unwrap()
    }

    #[tokio::test]
    async fn test_bundled_quiz_is_valid() {
        let quiz = LocalQuizService::bundled()
            .generate_quiz(&video(), &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(quiz.title(), "Rust Ownership Basics");
        assert_eq!(quiz.len(), 5);
        // "u64" given as option text
        assert_eq!(quiz.questions()[3].correct_option, 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let service = LocalQuizService::new(QuizSource::File(PathBuf::from(
            "/nonexistent/video-quiz/quiz.json",
        )));
        let err = service
            .generate_quiz(&video(), &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::File { .. }));
    }

    #[tokio::test]
    async fn test_file_with_no_questions_fails() {
        let path = std::env::temp_dir().join(format!("video-quiz-empty-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"transcript": "", "quiz": []}"#)
            .await
            .unwrap();

        let service = LocalQuizService::new(QuizSource::File(path.clone()));
        let err = service
            .generate_quiz(&video(), &GenerationParams::default())
            .await
            .unwrap_err();
        let _ = tokio::fs::remove_file(&path).await;

        assert!(matches!(err, GenerationError::NoQuestions));
    }
}
