//! Error types for the host boundary.

use hal_core::HalError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    /// Building or rendering the document failed.
    #[error(transparent)]
    Hal(#[from] HalError),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    /// A configuration file or string could not be read.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hal_errors_display_unchanged() {
        let inner = HalError::InvalidArgument("link requires a non-empty 'rel'".to_string());
        let err: HostError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn url_errors_name_the_url() {
        let err = HostError::InvalidUrl("missing scheme in 'localhost'".to_string());
        assert!(err.to_string().contains("localhost"));
    }
}
