//! Error types for the answer browser

use thiserror::Error;

/// Main error type for answer browser operations
#[derive(Debug, Error)]
pub enum AnswerError {
    /// Answer service failures
    #[error("Failed to get answer: {0}")]
    Service(#[from] ServiceError),
    /// Persistence mirror failures
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Navigation input that does not parse as a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Answer service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request never reached the service or the connection dropped
    #[error("request failed: {0}")]
    Request(String),
    /// Service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
    /// Service produced no answer text
    #[error("Received an empty response from the AI.")]
    EmptyResponse,
}

/// Persistence mirror errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed
    #[error("backend failure for key '{key}': {source}")]
    Backend {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// Persisted value could not be (de)serialized
    #[error("serialization failure for key '{key}': {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Convenience Result type for answer browser operations
pub type Result<T> = std::result::Result<T, AnswerError>;
