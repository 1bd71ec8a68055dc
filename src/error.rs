//! Error taxonomy for the watch pipeline.
//!
//! Recoverable upstream failures (a non-success status from the search API)
//! never reach this type; they are logged and contribute zero articles.
//! Everything here is fatal to the current run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Missing required file: {}", .0.display())]
    MissingConfig(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed summarizer output: {source} (preview: {preview})")]
    MalformedSummary {
        source: serde_json::Error,
        preview: String,
    },

    #[error("Assessment out of range: {0}")]
    InvalidAssessment(String),

    #[error("Summarizer error: {0}")]
    Summarizer(String),
}

pub type Result<T> = std::result::Result<T, WatchError>;
