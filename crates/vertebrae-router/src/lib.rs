//! # vertebrae-router
//!
//! Route patterns, route tables and first-match resolution for mocked
//! requests.
//!
//! This crate provides:
//! - Pattern compilation into matchers with positional captures
//! - A route table keyed by pattern, kept in registration order
//! - Per-method handlers with delivery delay and status code
//! - First-match resolution of a URL and method against the table
//!
//! ## Quick Start
//!
//! ```
//! use vertebrae_router::{resolve, Method, RouteSpec, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table
//!     .register_routes([
//!         ("/valid.json", RouteSpec::new().get(|_| r#"{"id":0,"test":"None"}"#.to_string())),
//!         ("/users/:id", RouteSpec::new().get(|c| format!("user {}", c[0])).timeout_ms(50)),
//!     ])
//!     .unwrap();
//!
//! let result = resolve(&table, "/users/42", &Method::Get);
//! assert_eq!(result.captures(), ["42"]);
//! ```
//!
//! ## Patterns
//!
//! The default compiler understands `:name` (one segment), `*name` (rest of
//! the path) and `( ... )` (optional part). Any other [`PatternCompiler`]
//! can be plugged in with [`RouteTable::with_compiler`].

mod error;
mod method;
mod pattern;
mod resolve;
mod route;
mod table;

pub use error::{Result, RouterError};
pub use method::Method;
pub use pattern::{CompiledPattern, Matcher, PatternCompiler, RegexCompiler, RoutePatternCompiler};
pub use resolve::{diagnose, resolve, resolve_str, MatchResult};
pub use route::{Handler, HandlerError, Route, RouteSpec, DEFAULT_STATUS_CODE};
pub use table::RouteTable;
