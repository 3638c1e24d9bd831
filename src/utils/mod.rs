//! Shared utilities and error types

pub mod error;

pub use error::{AnswerError, Result, ServiceError, StorageError};

/// Milliseconds since the Unix epoch, the timestamp unit of every persisted record
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
