// src/handlers/progress.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{error::AppError, models::progress::RecordProgressRequest, store::SharedStore};

/// Records one answered question and updates the user's stats.
pub async fn record_progress(
    State(store): State<SharedStore>,
    Json(payload): Json<RecordProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let progress = store.write().await.record_progress(payload);
    Ok((StatusCode::CREATED, Json(progress)))
}

pub async fn list_progress(
    State(store): State<SharedStore>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.read().await.progress_for_user(user_id)))
}
