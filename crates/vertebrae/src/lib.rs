//! # vertebrae
//!
//! A deterministic mock transport for testing asynchronous request code.
//!
//! Requests are resolved against registered routes instead of going to
//! the network. Each route supplies per-method handlers that turn URL
//! captures into response text, a delivery delay and a status code.
//! Unmatched requests complete with a 404 after a configurable delay.
//! Every outcome is delivered asynchronously and every pending request can
//! be aborted, so tests can exercise success, HTTP errors, parse errors,
//! slow responses and cancellation without a server.
//!
//! ## Quick Start
//!
//! ```
//! use vertebrae::{MockClient, MockTransport, RequestError, RouteSpec};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut transport = MockTransport::default();
//! transport.mock([
//!     ("/valid.json", RouteSpec::new().get(|_| r#"{"id":0,"test":"None"}"#.to_string())),
//!     ("/invalid.json", RouteSpec::new().get(|_| r#"{ id: 0, test: "None"}"#.to_string())),
//! ])?;
//!
//! let client = MockClient::new(transport);
//! let valid: serde_json::Value = client.get_json("/valid.json").await?;
//! assert_eq!(valid["id"], 0);
//!
//! let invalid = client.get_json::<serde_json::Value>("/invalid.json").await;
//! assert!(matches!(invalid, Err(RequestError::Parse(_))));
//! # Ok(())
//! # }
//! ```
//!
//! ## Transport Shape
//!
//! [`MockTransport::exchange`] returns the per-request object a request
//! layer plugs in: [`Exchange::send`] takes the headers and a completion
//! callback, [`Exchange::abort`] cancels. [`MockTransport::fetch`] wraps
//! the same flow in a future.
//!
//! ## Timing
//!
//! Delays run on tokio's clock. Tests using
//! `#[tokio::test(start_paused = true)]` observe them exactly and without
//! waiting in real time.

mod client;
mod completion;
mod error;
mod options;
mod request;
mod scheduler;
mod transport;

pub use client::{into_response, is_success_status, MockClient, RequestError, Response};
pub use completion::{Completion, Payload, StatusText};
pub use error::{MockError, Result};
pub use options::{DelayOptions, MockOptions, DEFAULT_NOT_FOUND_DELAY};
pub use request::{Headers, Request};
pub use scheduler::{DispatchHandle, DispatchScheduler, RequestState};
pub use transport::{Exchange, MockTransport, PendingRequest};
pub use vertebrae_router::{
    diagnose, resolve, resolve_str, CompiledPattern, Handler, HandlerError, MatchResult, Matcher,
    Method, PatternCompiler, RegexCompiler, Route, RoutePatternCompiler, RouteSpec, RouteTable,
    RouterError, DEFAULT_STATUS_CODE,
};
