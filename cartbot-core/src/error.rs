//! Core error types for Cartbot.

use thiserror::Error;

/// Core error type for Cartbot operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data from a backend response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
