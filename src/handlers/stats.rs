// src/handlers/stats.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::stats::{StudyTimeRequest, UpdateStatsRequest},
    store::SharedStore,
};

pub async fn get_stats(
    State(store): State<SharedStore>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let stats = store
        .read()
        .await
        .stats(user_id)
        .cloned()
        .ok_or(AppError::NotFound("User stats not found".to_string()))?;

    Ok(Json(stats))
}

/// Overwrites the given counters.
pub async fn update_stats(
    State(store): State<SharedStore>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateStatsRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let stats = store.write().await.update_stats(user_id, payload)?;
    Ok(Json(stats))
}

pub async fn add_study_time(
    State(store): State<SharedStore>,
    Path(user_id): Path<i64>,
    Json(payload): Json<StudyTimeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let stats = store.write().await.add_study_time(user_id, payload.minutes)?;
    Ok(Json(stats))
}

pub async fn reset_stats(
    State(store): State<SharedStore>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let stats = store.write().await.reset_stats(user_id)?;
    tracing::info!("Reset stats of user {}", user_id);
    Ok(Json(stats))
}
