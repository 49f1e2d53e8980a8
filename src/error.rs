use serde::Serialize;
use thiserror::Error;

/// Application error types for the reminder list.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Errors raised by the underlying blob store
    #[error("Storage error: {0}")]
    Storage(String),
    /// The reminder collection could not be serialized
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// Stored bytes could not be turned back into reminders
    #[error("Decoding error: {0}")]
    Decoding(String),
    /// Input rejected before it reached the store
    #[error("Validation error: {0}")]
    Validation(String),
    /// A reminder or row that does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.to_string()
    }
}

// Convenience constructors
impl AppError {
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        AppError::Storage(msg.into())
    }

    pub fn encoding<S: Into<String>>(msg: S) -> Self {
        AppError::Encoding(msg.into())
    }

    pub fn decoding<S: Into<String>>(msg: S) -> Self {
        AppError::Decoding(msg.into())
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        AppError::NotFound(msg.into())
    }
}

/// Result type alias used across the crate
pub type AppResult<T> = Result<T, AppError>;
