// src/ai/mod.rs

//! Access to the generative text model: prompts, transport and reply parsing.

pub mod fallback;
pub mod gateway;
pub mod gemini;
pub mod parse;
pub mod prompts;

use async_trait::async_trait;

pub use gateway::FeedbackGateway;
pub use gemini::GeminiClient;

/// Failures talking to the generative model. Every call is a single attempt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AiError {
    #[error("Gemini API key not configured. Set the GEMINI_API_KEY environment variable.")]
    MissingCredential,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Request to the AI model timed out. Please try again.")]
    Timeout,

    #[error("AI transport error: {0}")]
    Transport(String),

    #[error("AI reply could not be interpreted: {0}")]
    UnparseableResponse(String),
}

/// Prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}
