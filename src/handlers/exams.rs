// src/handlers/exams.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    exam::{convert_exam_json, load_from_file, load_from_url},
    models::question::{BatchImportResponse, NewQuestion},
    store::SharedStore,
};

/// Converts a raw exam document into questions without storing them.
pub async fn convert_exam(body: String) -> Result<impl IntoResponse, AppError> {
    let questions = convert_exam_json(&body)?;
    tracing::info!("Converted exam document into {} questions", questions.len());
    Ok(Json(questions))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportExamRequest {
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
}

/// Downloads an exam document and stores its questions.
pub async fn import_exam(
    State(store): State<SharedStore>,
    State(http): State<reqwest::Client>,
    Json(payload): Json<ImportExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let questions = load_from_url(&http, payload.url.trim()).await?;
    let outcome = store
        .write()
        .await
        .create_questions(questions.into_iter().map(NewQuestion::from).collect());

    let status = if outcome.created.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(BatchImportResponse::from(outcome))))
}

/// Questions of the bundled example exam.
pub async fn example_exam(State(config): State<Config>) -> Result<impl IntoResponse, AppError> {
    let questions = load_from_file(&config.example_exam_path).await?;
    Ok(Json(questions))
}
