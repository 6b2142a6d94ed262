// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Length of a simulated exam.
pub const EXAM_DURATION_MINUTES: u32 = 60;

/// Points a question is worth per difficulty step in the exam simulation.
pub const POINTS_PER_DIFFICULTY: u32 = 5;

/// Minimum percentage needed to pass the exam simulation.
pub const PASSING_SCORE_PERCENTAGE: f64 = 50.0;

/// A level counts as completed once this share of answered questions was correct.
pub const LEVEL_COMPLETION_RATIO: f64 = 0.8;

/// Upper bound accepted for any counter sent by a client.
pub const MAX_COUNTER_VALUE: u32 = 1_000_000;

/// The single seeded user every client talks about.
pub const DEFAULT_USER_ID: i64 = 1;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,

    /// Credential for the generative model. Optional: without it every AI
    /// endpoint fails fast while the rest of the app keeps working.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ai_timeout_secs: u64,

    pub example_exam_path: String,
    pub static_dir: String,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            rust_log: "info".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-pro".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            ai_timeout_secs: 30,
            example_exam_path: "attached_assets/ap1_frühjahr_2025.json".to_string(),
            static_dir: "dist/public".to_string(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:5000".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let default = Self::default();

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or(default.cors_origins);

        Self {
            host: env::var("HOST").unwrap_or(default.host),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
            rust_log: env::var("RUST_LOG").unwrap_or(default.rust_log),
            gemini_api_key,
            gemini_model: env::var("GEMINI_MODEL").unwrap_or(default.gemini_model),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or(default.gemini_base_url),
            ai_timeout_secs: env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.ai_timeout_secs),
            example_exam_path: env::var("EXAMPLE_EXAM_PATH").unwrap_or(default.example_exam_path),
            static_dir: env::var("STATIC_DIR").unwrap_or(default.static_dir),
            cors_origins,
        }
    }
}
