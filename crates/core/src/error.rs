//! Error types for the Corpografo console
//!
//! This module provides unified error handling across the console:
//! transport and decoding failures, application errors reported by the
//! remote API, session invalidation, and configuration errors in entity
//! specifications.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the Corpografo console
#[derive(Debug, Error)]
pub enum ConsoleError {
    // ========================================================================
    // Remote API Errors
    // ========================================================================
    /// No HTTP response was received (connection refused, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body could not be decoded into the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API reported that the bearer token is no longer valid
    #[error("Session is no longer valid: {0}")]
    SessionInvalid(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// An entity specification is malformed
    #[error("Invalid specification for '{entity}.{field}': {message}")]
    Config {
        entity: String,
        field: String,
        message: String,
    },

    /// Invalid configuration value (environment, settings file)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown entity type name
    #[error("Unknown entity type: '{0}'")]
    UnknownEntityType(String),

    /// A path that does not map to any route
    #[error("Invalid route: '{0}'")]
    InvalidRoute(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema catalog could not be parsed
    #[error("Schema parse error: {0}")]
    Schema(#[from] toml::de::Error),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Operation cancelled by user
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl ConsoleError {
    /// Create a configuration error for one field of an entity specification
    pub fn config(
        entity: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        ConsoleError::Config {
            entity: entity.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create an API error
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        ConsoleError::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a decoding error
    pub fn decode(msg: impl Into<String>) -> Self {
        ConsoleError::Decode(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        ConsoleError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ConsoleError::Config { .. }
                | ConsoleError::InvalidConfig(_)
                | ConsoleError::UnknownEntityType(_)
                | ConsoleError::Schema(_)
        )
    }

    /// Check if this error means the session must be discarded
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, ConsoleError::SessionInvalid(_))
    }

    /// Check if this error came from talking to the remote API
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ConsoleError::Transport(_)
                | ConsoleError::Decode(_)
                | ConsoleError::Api { .. }
                | ConsoleError::SessionInvalid(_)
        )
    }

    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ConsoleError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias using ConsoleError
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> ConsoleResult<T>;
}

impl<T, E: Into<ConsoleError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> ConsoleResult<T> {
        self.map_err(|e| {
            let err: ConsoleError = e.into();
            ConsoleError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = ConsoleError::config("author", "documents", "missing link template");
        assert!(err.is_config());
        assert!(!err.is_remote());
        assert_eq!(
            err.to_string(),
            "Invalid specification for 'author.documents': missing link template"
        );
    }

    #[test]
    fn test_api_error() {
        let err = ConsoleError::api(400, "name is required");
        assert!(err.is_remote());
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "API error (400): name is required");
    }

    #[test]
    fn test_session_invalid() {
        let err = ConsoleError::SessionInvalid("Not enough segments".to_string());
        assert!(err.is_session_invalid());
        assert!(err.is_remote());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_error_with_context() {
        let err = ConsoleError::with_context("Loading schema", "file is empty");
        assert_eq!(err.to_string(), "Loading schema: file is empty");
    }

    #[test]
    fn test_result_ext() {
        let parsed: Result<serde_json::Value, serde_json::Error> = serde_json::from_str("{");
        let err = parsed.with_context("Decoding record").unwrap_err();
        assert!(err.to_string().starts_with("Decoding record: JSON serialization error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConsoleError = io_err.into();
        assert!(matches!(err, ConsoleError::Io(_)));
    }
}
