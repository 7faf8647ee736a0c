//! Error types for CutStat.

use thiserror::Error;

/// CutStat error type.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Contract violation in caller-supplied input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Numerical computation failure
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
