//! A minimal request-issuing layer on top of [`MockTransport`].
//!
//! This is the part of the stack that application code talks to. It builds
//! requests, hands them to the transport, and decides what counts as a
//! failed response. Body parsing happens here, never in the transport, so
//! a malformed body surfaces as [`RequestError::Parse`].

use serde::de::DeserializeOwned;
use thiserror::Error;
use vertebrae_router::{HandlerError, Method};

use crate::completion::{Completion, StatusText};
use crate::error::MockError;
use crate::request::Request;
use crate::transport::{MockTransport, PendingRequest};

/// Errors seen by code issuing requests through a [`MockClient`].
#[derive(Debug, Error)]
pub enum RequestError {
    /// The response status is not a success status.
    #[error("request failed with status {status} ({status_text})")]
    Http {
        /// The status code.
        status: u16,
        /// The transport's outcome label.
        status_text: StatusText,
        /// The response text, empty when no route matched.
        body: String,
    },

    /// The route handler failed.
    #[error("route handler failed: {0}")]
    Handler(HandlerError),

    /// The body could not be parsed.
    #[error("parsererror: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request was aborted.
    #[error("request aborted")]
    Aborted,

    /// The transport ended the request without an outcome.
    #[error(transparent)]
    Transport(MockError),
}

impl From<MockError> for RequestError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Aborted => Self::Aborted,
            other => Self::Transport(other),
        }
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response text, exactly as produced by the route handler.
    pub body: String,
}

impl Response {
    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Parse`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Returns whether `status` is treated as a successful response.
#[must_use]
pub const fn is_success_status(status: u16) -> bool {
    matches!(status, 200..=299 | 304)
}

/// Issues requests through a [`MockTransport`].
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    transport: MockTransport,
}

impl MockClient {
    /// Creates a client over `transport`.
    #[must_use]
    pub const fn new(transport: MockTransport) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &MockTransport {
        &self.transport
    }

    /// Returns the transport for configuration.
    pub fn transport_mut(&mut self) -> &mut MockTransport {
        &mut self.transport
    }

    /// Starts a request without waiting for it, so it can be aborted.
    ///
    /// Parameters are form-encoded into the query string for GET, HEAD
    /// and DELETE, and into the body otherwise.
    pub fn start(&self, url: &str, method: Method, params: &[(&str, &str)]) -> PendingRequest {
        self.transport.fetch(build_request(url, method, params))
    }

    /// Issues a request and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Http`] for non-success statuses (including
    /// 404 when no route matched), [`RequestError::Handler`] when the route
    /// handler failed, and [`RequestError::Aborted`] if the request was
    /// aborted.
    pub async fn request(
        &self,
        url: &str,
        method: Method,
        params: &[(&str, &str)],
    ) -> Result<Response, RequestError> {
        let completion = self.start(url, method, params).await?;
        into_response(completion)
    }

    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// See [`MockClient::request`].
    pub async fn get(&self, url: &str) -> Result<Response, RequestError> {
        self.request(url, Method::Get, &[]).await
    }

    /// Issues a GET request and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// See [`MockClient::request`]; additionally returns
    /// [`RequestError::Parse`] if the body is not valid JSON for `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RequestError> {
        self.get(url).await?.json()
    }
}

/// Converts a transport completion into the client's response or error.
///
/// # Errors
///
/// Returns [`RequestError::Http`] or [`RequestError::Handler`] for
/// unsuccessful completions.
pub fn into_response(completion: Completion) -> Result<Response, RequestError> {
    match completion {
        Completion::Delivered {
            status,
            response_text,
        } if is_success_status(status) => Ok(Response {
            status,
            body: response_text,
        }),
        Completion::Delivered {
            status,
            response_text,
        } => Err(RequestError::Http {
            status,
            status_text: StatusText::Success,
            body: response_text,
        }),
        Completion::NotFound => Err(RequestError::Http {
            status: 404,
            status_text: StatusText::Error,
            body: String::new(),
        }),
        Completion::HandlerFailed(err) => Err(RequestError::Handler(err)),
    }
}

fn build_request(url: &str, method: Method, params: &[(&str, &str)]) -> Request {
    if params.is_empty() {
        return Request::new(method, url);
    }

    let encoded = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    if method.params_in_query() {
        let separator = if url.contains('?') { '&' } else { '?' };
        Request::new(method, format!("{url}{separator}{encoded}"))
    } else {
        Request::new(method, url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let req = build_request("/search", Method::Get, &[("q", "a b"), ("page", "2")]);
        assert_eq!(req.url, "/search?q=a%20b&page=2");
        assert!(req.body.is_empty());

        let req = build_request("/search?x=1", Method::Get, &[("q", "c")]);
        assert_eq!(req.url, "/search?x=1&q=c");
    }

    #[test]
    fn test_body_params() {
        let req = build_request("/users", Method::Post, &[("name", "Jo")]);
        assert_eq!(req.url, "/users");
        assert_eq!(req.body, b"name=Jo");
        assert_eq!(
            req.get_header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_delete_params_in_body() {
        let req = build_request("/users/7", Method::Delete, &[("reason", "spam")]);
        assert_eq!(req.url, "/users/7");
        assert_eq!(req.body, b"reason=spam");

        let req = build_request("/users/7", Method::Head, &[("x", "1")]);
        assert_eq!(req.url, "/users/7?x=1");
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_success_statuses() {
        assert!(is_success_status(200));
        assert!(is_success_status(204));
        assert!(is_success_status(304));
        assert!(!is_success_status(302));
        assert!(!is_success_status(500));
    }

    #[test]
    fn test_into_response() {
        let ok = into_response(Completion::Delivered {
            status: 201,
            response_text: "done".to_string(),
        })
        .unwrap();
        assert_eq!(ok.body, "done");

        let err = into_response(Completion::Delivered {
            status: 503,
            response_text: "busy".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, RequestError::Http { status: 503, .. }));

        assert!(matches!(
            into_response(Completion::NotFound),
            Err(RequestError::Http { status: 404, status_text: StatusText::Error, .. })
        ));
    }
}
