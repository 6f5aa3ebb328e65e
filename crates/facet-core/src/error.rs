//! Error types for the facet search engine.

use std::time::Duration;

use thiserror::Error;

/// Search request failures, classified by how the orchestrator reacts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Network or server failure. Surfaced to the user with the
    /// server-provided message.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The request was cancelled because a newer query superseded it.
    /// Never surfaced.
    #[error("request cancelled")]
    Cancelled,

    /// The request exceeded the configured deadline.
    #[error("request timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl SearchError {
    /// Whether this failure may produce user-visible feedback.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, SearchError::Cancelled)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// User-visible failure notification.
///
/// Carries the server-provided message for a failed request. Presentation
/// is up to the embedding application; the engine only broadcasts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Short headline.
    pub title: String,

    /// Server-provided detail.
    pub message: String,
}

impl Alert {
    /// Create an alert.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Alert for a failed search request.
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::new("Request failed", message)
    }
}
