//! Error types for tagkit.

use thiserror::Error;

/// Result type alias using tagkit's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tagkit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found (record deleted, unknown entity set)
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP/network request failed before a response was received
    #[error("Request error: {0}")]
    Request(String),

    /// Remote store answered with a non-success status
    #[error("Remote store error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
