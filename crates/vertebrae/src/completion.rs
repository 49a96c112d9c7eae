//! Completion values delivered to the caller of a mocked request.

use std::fmt;

use vertebrae_router::HandlerError;

/// The outcome label passed alongside the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusText {
    /// A route handled the request.
    Success,
    /// No route handled the request, or its handler failed.
    Error,
}

impl StatusText {
    /// Returns the label as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StatusText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The response payload of a successful completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload<'a> {
    /// The handler's response text, unmodified.
    pub response_text: &'a str,
}

/// The single outcome delivered for a mocked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A route handler produced a response.
    Delivered {
        /// The route's configured status code.
        status: u16,
        /// The handler's response text.
        response_text: String,
    },
    /// No route matched the URL with a handler for the method.
    NotFound,
    /// The matched route's handler failed.
    HandlerFailed(HandlerError),
}

impl Completion {
    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Delivered { status, .. } => *status,
            Self::NotFound => 404,
            Self::HandlerFailed(_) => 500,
        }
    }

    /// Returns the outcome label.
    #[must_use]
    pub const fn status_text(&self) -> StatusText {
        match self {
            Self::Delivered { .. } => StatusText::Success,
            Self::NotFound | Self::HandlerFailed(_) => StatusText::Error,
        }
    }

    /// Returns the payload, present only when a handler produced text.
    #[must_use]
    pub fn payload(&self) -> Option<Payload<'_>> {
        match self {
            Self::Delivered { response_text, .. } => Some(Payload { response_text }),
            Self::NotFound | Self::HandlerFailed(_) => None,
        }
    }

    /// Returns whether a handler produced a response.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}
