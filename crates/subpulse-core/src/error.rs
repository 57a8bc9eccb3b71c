//! Error types for SubPulse.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Content source error: {0}")]
    Source(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
