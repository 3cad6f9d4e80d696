//! Error types for HAL document construction and serialization.

use thiserror::Error;

/// Top-level result type for HAL operations.
pub type Result<T> = std::result::Result<T, HalError>;

/// Top-level error type for HAL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
    /// A required field was missing or a value was rejected at construction.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A state value could not be converted to, or rendered as, JSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

impl HalError {
    pub(crate) fn missing(field: &str, owner: &str) -> Self {
        HalError::InvalidArgument(format!("{owner} requires a non-empty '{field}'"))
    }
}

impl From<serde_json::Error> for HalError {
    fn from(err: serde_json::Error) -> Self {
        HalError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for HalError {
    fn from(err: std::io::Error) -> Self {
        HalError::Io(err.to_string())
    }
}
