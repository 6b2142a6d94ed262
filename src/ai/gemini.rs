// src/ai/gemini.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{
    ai::{AiError, TextGenerator},
    config::Config,
};

/// `TextGenerator` backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AiError> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
            Duration::from_secs(config.ai_timeout_secs),
        )
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingCredential)?;

        tracing::debug!("Calling Gemini model {}", self.model);

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Gemini rate limit hit");
            return Err(AiError::RateLimited);
        }
        if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
            return Err(AiError::Timeout);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("Gemini returned {}: {}", status, detail);
            return Err(AiError::Transport(format!("HTTP status {}", status)));
        }

        let parsed: GenerateResponse = response.json().await.map_err(map_transport_error)?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AiError::UnparseableResponse("empty candidate list".to_string()));
        }

        Ok(text)
    }
}

fn map_transport_error(err: reqwest::Error) -> AiError {
    if err.is_timeout() {
        AiError::Timeout
    } else {
        AiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    async fn spawn_mock(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        address
    }

    fn client(base_url: &str, key: Option<&str>) -> GeminiClient {
        GeminiClient::new(
            key.map(str::to_string),
            base_url,
            "gemini-pro",
            Duration::from_millis(500),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        // Port 9 is discard; a real request would fail with a transport error.
        let gemini = client("http://127.0.0.1:9", None);
        assert!(!gemini.has_credential());
        assert_eq!(gemini.generate("Hallo").await, Err(AiError::MissingCredential));
    }

    #[tokio::test]
    async fn test_extracts_candidate_text() {
        let app = Router::new().route(
            "/v1beta/models/{action}",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default().to_string();
                Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "Echo: " }, { "text": prompt }] } }]
                }))
            }),
        );
        let address = spawn_mock(app).await;

        let text = client(&address, Some("k")).generate("Was ist DNS?").await.unwrap();
        assert_eq!(text, "Echo: Was ist DNS?");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let app = Router::new().route(
            "/v1beta/models/{action}",
            post(|| async { StatusCode::TOO_MANY_REQUESTS }),
        );
        let address = spawn_mock(app).await;
        assert_eq!(client(&address, Some("k")).generate("x").await, Err(AiError::RateLimited));

        let app = Router::new().route(
            "/v1beta/models/{action}",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let address = spawn_mock(app).await;
        assert!(matches!(
            client(&address, Some("k")).generate("x").await,
            Err(AiError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_upstream_is_timeout() {
        let app = Router::new().route(
            "/v1beta/models/{action}",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "candidates": [] }))
            }),
        );
        let address = spawn_mock(app).await;
        assert_eq!(client(&address, Some("k")).generate("x").await, Err(AiError::Timeout));
    }

    #[tokio::test]
    async fn test_empty_candidates_are_unparseable() {
        let app = Router::new().route(
            "/v1beta/models/{action}",
            post(|| async { Json(json!({ "candidates": [] })) }),
        );
        let address = spawn_mock(app).await;
        assert!(matches!(
            client(&address, Some("k")).generate("x").await,
            Err(AiError::UnparseableResponse(_))
        ));
    }
}
