//! Error types for route registration and resolution.

use thiserror::Error;

/// Router-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The route pattern could not be compiled into a matcher.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No route matched the request.
    #[error("no route matched: {method} {url}")]
    NotFound { method: String, url: String },

    /// A route matched the URL but has no handler for the method.
    #[error("method not allowed: {method} for {url}")]
    MethodNotAllowed { method: String, url: String },

    /// The method token is empty or contains non-token characters.
    #[error("invalid method: {0:?}")]
    InvalidMethod(String),
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
