//! Error types for voxdex.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for voxdex operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Batch alignment error: {segments} segments, {topics} topic sets, {embeddings} embeddings"
    )]
    Alignment {
        segments: usize,
        topics: usize,
        embeddings: usize,
    },

    #[error("Transcription failed for {}: {reason}", file.display())]
    Transcription { file: PathBuf, reason: String },

    #[error("Topic extraction failed: {0}")]
    TopicExtraction(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Could not parse vector: token {position} ({token:?}) is not a number")]
    Parse { position: usize, token: String },

    #[error("Vector has dimension {actual}, expected {expected}. Please fix this and try again.")]
    Dimension { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for voxdex operations.
pub type Result<T> = std::result::Result<T, Error>;
