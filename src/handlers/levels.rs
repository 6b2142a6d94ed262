// src/handlers/levels.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::level::{LevelSessionRequest, NewQuizLevel, NewUserLevelProgress, UpdateLevelProgressRequest},
    store::SharedStore,
};

/// Lists all levels in play order.
pub async fn list_levels(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.read().await.levels()))
}

pub async fn get_level(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let level = store
        .read()
        .await
        .level(id)
        .cloned()
        .ok_or(AppError::NotFound("Level not found".to_string()))?;

    Ok(Json(level))
}

pub async fn create_level(
    State(store): State<SharedStore>,
    Json(payload): Json<NewQuizLevel>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let level = store.write().await.create_level(payload);
    Ok((StatusCode::CREATED, Json(level)))
}

// --- Level progress ---

pub async fn list_level_progress(
    State(store): State<SharedStore>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.read().await.level_progress_for_user(user_id)))
}

pub async fn get_level_progress(
    State(store): State<SharedStore>,
    Path((user_id, level_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let progress = store
        .read()
        .await
        .level_progress(user_id, level_id)
        .cloned()
        .ok_or(AppError::NotFound("User level progress not found".to_string()))?;

    Ok(Json(progress))
}

pub async fn create_level_progress(
    State(store): State<SharedStore>,
    Json(payload): Json<NewUserLevelProgress>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut store = store.write().await;
    if store.level(payload.level_id).is_none() {
        return Err(AppError::NotFound("Level not found".to_string()));
    }
    let progress = store.create_level_progress(payload);

    Ok((StatusCode::CREATED, Json(progress)))
}

/// Partial update. Unknown rows are a 404, never created here.
pub async fn update_level_progress(
    State(store): State<SharedStore>,
    Path((user_id, level_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateLevelProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let progress = store
        .write()
        .await
        .update_level_progress(user_id, level_id, payload)?;

    Ok(Json(progress))
}

/// Books a finished quiz session and unlocks the next level when earned.
pub async fn record_level_session(
    State(store): State<SharedStore>,
    Path((user_id, level_id)): Path<(i64, i64)>,
    Json(payload): Json<LevelSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let outcome = store.write().await.record_level_session(
        user_id,
        level_id,
        payload.questions_answered,
        payload.questions_correct,
    )?;

    Ok(Json(outcome))
}
