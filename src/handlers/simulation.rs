// src/handlers/simulation.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    ai::FeedbackGateway,
    error::AppError,
    models::simulation::{EvaluateExamRequest, EvaluateExamResponse},
    simulation::{ExamSession, submit_and_evaluate},
    store::SharedStore,
};

/// Scores a finished exam attempt over all questions of a category.
///
/// Answers are keyed by the question's position in the category listing.
pub async fn evaluate_exam(
    State(store): State<SharedStore>,
    State(gateway): State<Arc<FeedbackGateway>>,
    Json(payload): Json<EvaluateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let questions = store.read().await.questions_by_category(&payload.category);
    let mut session = ExamSession::with_default_duration(questions)?;
    for (index, answer) in payload.answers {
        session.set_answer_at(index, answer)?;
    }
    let answered_count = session.answered_count();

    let summary = submit_and_evaluate(&mut session, &gateway).await?;
    tracing::info!(
        "Exam simulation in {}: {}/{} points",
        payload.category,
        summary.total_score,
        summary.max_possible_score
    );

    Ok(Json(EvaluateExamResponse {
        question_count: session.question_count(),
        answered_count,
        results: session.results().clone(),
        total_score: summary.total_score,
        max_possible_score: summary.max_possible_score,
        percentage: summary.percentage,
        grade: summary.grade.label().to_string(),
        grade_number: summary.grade.number(),
        passed: summary.passed,
    }))
}
