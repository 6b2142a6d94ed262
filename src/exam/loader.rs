// src/exam/loader.rs

use std::path::Path;

use url::Url;

use crate::{
    exam::{ImportError, transform::convert_exam_json},
    models::question::Question,
};

/// Reads an exam document from disk and converts it.
pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<Question>, ImportError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let questions = convert_exam_json(&raw)?;
    tracing::info!("Loaded {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

/// Downloads an exam document with a single GET and converts it.
///
/// Only http and https URLs are accepted. No retries: a failed attempt is
/// reported to the caller as `Fetch`.
pub async fn load_from_url(client: &reqwest::Client, url: &str) -> Result<Vec<Question>, ImportError> {
    let fetch_error = |reason: String| ImportError::Fetch {
        url: url.to_string(),
        reason,
    };

    let invalid_url = |reason: String| ImportError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid_url(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid_url(format!("unsupported scheme '{}'", parsed.scheme())));
    }

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP status {}", status)));
    }

    let raw = response.text().await.map_err(|e| fetch_error(e.to_string()))?;

    let questions = convert_exam_json(&raw)?;
    tracing::info!("Loaded {} questions from {}", questions.len(), url);
    Ok(questions)
}
