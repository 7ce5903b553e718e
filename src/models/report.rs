/// Label shown for a question the user left unanswered.
pub const NO_ANSWER: &str = "No answer";

/// Where a score report was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// Computed on this machine from the stored answers.
    Local,
    /// Returned by the answer verification service.
    Remote,
}

/// Scoring outcome for a single question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub prompt: String,
    /// Text of the selected option, `None` when unanswered.
    pub selected: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

impl QuestionOutcome {
    pub fn selected_label(&self) -> &str {
        self.selected.as_deref().unwrap_or(NO_ANSWER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub correct_count: usize,
    pub total_count: usize,
    /// 0..=100, rounded half up.
    pub percentage: u8,
    pub details: Vec<QuestionOutcome>,
    pub source: ScoreSource,
}

impl ScoreReport {
    pub fn from_outcomes(details: Vec<QuestionOutcome>, source: ScoreSource) -> Self {
        let correct_count = details.iter().filter(|d| d.is_correct).count();
        let total_count = details.len();

        Self {
            correct_count,
            total_count,
            percentage: percentage(correct_count, total_count),
            details,
            source,
        }
    }
}

/// `round(100 * correct / total)` with halves rounded up, 0 for an empty total.
pub fn percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    let rounded = (200 * correct + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(2, 5), 40);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(0, 7), 0);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_selected_label_for_missing_answer() {
        let outcome = QuestionOutcome {
            prompt: "Which hook runs effects?".to_string(),
            selected: None,
            correct_answer: "useEffect".to_string(),
            is_correct: false,
            explanation: String::new(),
        };
        assert_eq!(outcome.selected_label(), NO_ANSWER);
    }
}
