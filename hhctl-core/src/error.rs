//! Structured error types for hhctl-core.
//!
//! The CLI wraps these in `anyhow` for context; library callers can match
//! on the variant.

use std::io;
use thiserror::Error;

/// Main error type for hhctl-core operations
#[derive(Error, Debug)]
pub enum HhError {
    /// Transport-level HTTP failure (connect, TLS, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON parsing failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Configuration error (bad env var, unreadable config file)
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Result type alias for hhctl-core operations
pub type Result<T> = std::result::Result<T, HhError>;

impl HhError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = HhError::config("DB_PORT must be a number, got 'abc'");
        assert_eq!(
            err.to_string(),
            "Configuration error: DB_PORT must be a number, got 'abc'"
        );
    }

    #[test]
    fn test_json_error_carries_context() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HhError::json("employer 1740", source);
        assert!(err.to_string().starts_with("JSON error at employer 1740"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: HhError = io_err.into();
        assert!(matches!(err, HhError::Io { .. }));
    }
}
