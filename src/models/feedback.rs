// src/models/feedback.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for grading one free-text answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    #[validate(length(min = 1))]
    pub question_text: String,

    pub user_answer: String,

    #[serde(default)]
    pub correct_answer: String,

    #[validate(range(min = 1, max = 3))]
    pub difficulty: u8,

    #[validate(range(min = 1))]
    pub max_points: u32,
}

/// Structured grading result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    pub feedback: String,
    pub is_correct: bool,
    pub score: u32,
    pub max_score: u32,
}

impl GradingResult {
    /// Placeholder used when grading a single question failed.
    pub fn failed(max_score: u32) -> Self {
        Self {
            feedback: "Fehler bei der Bewertung durch die KI. Bitte überprüfe deine Internetverbindung."
                .to_string(),
            is_correct: false,
            score: 0,
            max_score,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `prompt` is optional: without it the tip prompt is built from the
/// user's stats.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudyTipRequest {
    #[validate(length(min = 1, max = 4000))]
    pub prompt: Option<String>,

    pub user_id: Option<i64>,

    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudyTipResponse {
    pub tip: String,
}

/// `prompt` is optional when `questionId` names a stored question.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    #[validate(length(min = 1, max = 4000))]
    pub prompt: Option<String>,

    pub question_id: Option<i64>,

    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HintSource {
    Ai,
    Fallback,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintResponse {
    pub hint: String,
    pub hints: Vec<String>,
    pub question_id: Option<i64>,
    pub source: HintSource,
}
