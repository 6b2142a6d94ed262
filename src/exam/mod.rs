// src/exam/mod.rs

//! Import of IHK exam documents into normalized questions.

pub mod loader;
pub mod transform;

use std::path::PathBuf;

pub use loader::{load_from_file, load_from_url};
pub use transform::{
    CategoryRule, DifficultyThresholds, TransformOptions, convert_exam_json, transform, transform_with,
};

/// Failures while reading or converting an exam document.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("malformed exam document: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    #[error("failed to read exam file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid exam URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to fetch exam from {url}: {reason}")]
    Fetch { url: String, reason: String },
}
