//! Error types for mom

use crate::bus::HandlerError;
use thiserror::Error;

/// The main error type for mom operations
#[derive(Error, Debug)]
pub enum Error {
    /// A subscriber failed while a message was being dispatched
    #[error("Handler #{index} for topic '{topic}' failed: {source}")]
    Handler {
        topic: String,
        index: usize,
        #[source]
        source: HandlerError,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// A specialized Result type for mom operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_display() {
        let err = Error::Handler {
            topic: "orders".into(),
            index: 2,
            source: HandlerError::Failed("boom".into()),
        };
        assert_eq!(
            err.to_string(),
            "Handler #2 for topic 'orders' failed: Handler failed: boom"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_serde_json_error_converts() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
