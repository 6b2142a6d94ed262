// src/models/simulation.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::feedback::GradingResult;

/// DTO for submitting a simulated exam.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateExamRequest {
    #[validate(length(min = 1))]
    pub category: String,

    /// Free-text answers keyed by question index within the category.
    #[serde(default)]
    pub answers: BTreeMap<usize, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateExamResponse {
    pub question_count: usize,
    pub answered_count: usize,
    pub results: BTreeMap<usize, GradingResult>,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub percentage: f64,
    pub grade: String,
    pub grade_number: u8,
    pub passed: bool,
}
