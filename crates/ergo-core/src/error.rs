//! Error types for ergo

use thiserror::Error;

/// ergo error type
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Destructured tree does not match the expected shape or tag
    #[error("Structure error: {0}")]
    Structure(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
