//! Error types for the mock transport.

use thiserror::Error;
use vertebrae_router::RouterError;

/// Mock transport errors.
#[derive(Debug, Error)]
pub enum MockError {
    /// Route registration failed.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Options could not be parsed.
    #[error("invalid mock options: {0}")]
    Options(#[from] serde_json::Error),

    /// The request was aborted before it completed.
    #[error("request aborted")]
    Aborted,

    /// The dispatch ended without delivering a completion.
    #[error("dispatch dropped before completing")]
    Dropped,
}

/// Result type alias for mock transport operations.
pub type Result<T> = std::result::Result<T, MockError>;
