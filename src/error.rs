// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{ai::AiError, exam::ImportError, simulation::SessionError, store::StoreError};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 403 Forbidden (e.g., playing a locked level)
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 400 / 500 / 502 depending on the import step that failed
    Import(ImportError),

    // 429 / 502 / 503 / 504 depending on the model failure
    Ai(AiError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InternalServerError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            AppError::Import(e) => match e {
                ImportError::MalformedDocument(_) => (StatusCode::BAD_REQUEST, "MalformedDocument"),
                ImportError::InvalidUrl { .. } => (StatusCode::BAD_REQUEST, "ValidationError"),
                ImportError::FileRead { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "FileReadError"),
                ImportError::Fetch { .. } => (StatusCode::BAD_GATEWAY, "FetchError"),
            },
            AppError::Ai(e) => match e {
                AiError::MissingCredential => (StatusCode::SERVICE_UNAVAILABLE, "MissingCredential"),
                AiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RateLimited"),
                AiError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "Timeout"),
                AiError::Transport(_) | AiError::UnparseableResponse(_) => {
                    (StatusCode::BAD_GATEWAY, "TransportError")
                }
            },
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            AppError::BadRequest(msg) | AppError::Forbidden(msg) | AppError::NotFound(msg) => msg,
            AppError::Import(e) => {
                if status.is_server_error() {
                    tracing::error!("Exam import failed: {}", e);
                }
                e.to_string()
            }
            AppError::Ai(e) => {
                if status.is_server_error() {
                    tracing::error!("AI request failed: {}", e);
                }
                e.to_string()
            }
        };

        let body = Json(json!({
            "message": message,
            "error": code,
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            locked @ StoreError::Locked(_) => AppError::Forbidden(locked.to_string()),
        }
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::Import(err)
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::Ai(err)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoQuestions => AppError::NotFound(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

/// Converts validation failures into `AppError::BadRequest`.
/// Allows using `?` on `payload.validate()`.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
