// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{BatchImportRequest, BatchImportResponse, NewQuestion},
    store::SharedStore,
};

/// Lists all questions.
pub async fn list_questions(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.read().await.questions()))
}

/// Fetches a single question by id.
pub async fn get_question(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = store
        .read()
        .await
        .question(id)
        .cloned()
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

pub async fn questions_by_category(
    State(store): State<SharedStore>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.read().await.questions_by_category(&category)))
}

pub async fn questions_by_difficulty(
    State(store): State<SharedStore>,
    Path(difficulty): Path<u8>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.read().await.questions_by_difficulty(difficulty)))
}

/// Inclusive difficulty range.
pub async fn questions_by_difficulty_range(
    State(store): State<SharedStore>,
    Path((min, max)): Path<(u8, u8)>,
) -> Result<impl IntoResponse, AppError> {
    if min > max {
        return Err(AppError::BadRequest(
            "Minimum difficulty must not exceed maximum difficulty".to_string(),
        ));
    }
    Ok(Json(store.read().await.questions_by_difficulty_range(min, max)))
}

/// Creates a single question.
pub async fn create_question(
    State(store): State<SharedStore>,
    Json(payload): Json<NewQuestion>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = store.write().await.create_question(payload);
    tracing::info!("Created question {}", question.id);

    Ok((StatusCode::CREATED, Json(question)))
}

/// Imports many questions at once, skipping texts that already exist.
pub async fn batch_import(
    State(store): State<SharedStore>,
    Json(payload): Json<BatchImportRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.questions.is_empty() {
        return Err(AppError::BadRequest("No questions provided".to_string()));
    }
    payload.validate()?;

    let outcome = store.write().await.create_questions(payload.questions);
    tracing::info!(
        "Batch import: {} imported, {} skipped",
        outcome.created.len(),
        outcome.skipped
    );

    let status = if outcome.created.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(BatchImportResponse::from(outcome))))
}
