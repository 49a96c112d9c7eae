//! Route definitions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::method::Method;
use crate::pattern::Matcher;

/// Status code used when a route does not configure one.
pub const DEFAULT_STATUS_CODE: u16 = 200;

/// A failure raised by a route handler while producing response text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a new handler error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A route handler: receives the URL captures and returns the response text.
pub type Handler = Arc<dyn Fn(&[String]) -> Result<String, HandlerError> + Send + Sync>;

/// The definition of a route before its pattern is compiled.
///
/// # Example
///
/// ```
/// use vertebrae_router::RouteSpec;
///
/// let spec = RouteSpec::new()
///     .get(|captures| format!(r#"{{"id":{}}}"#, captures[0]))
///     .timeout_ms(50)
///     .status_code(201);
/// ```
#[derive(Clone, Default)]
pub struct RouteSpec {
    pub(crate) handlers: HashMap<Method, Handler>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) status_code: Option<u16>,
}

impl RouteSpec {
    /// Creates an empty route spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an infallible handler for `method`.
    #[must_use]
    pub fn on<F>(self, method: Method, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.try_on(method, move |captures| Ok(handler(captures)))
    }

    /// Adds a handler for `method` that may fail.
    #[must_use]
    pub fn try_on<F>(mut self, method: Method, handler: F) -> Self
    where
        F: Fn(&[String]) -> Result<String, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(method.normalized(), Arc::new(handler));
        self
    }

    /// Adds a GET handler.
    #[must_use]
    pub fn get<F>(self, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.on(Method::Get, handler)
    }

    /// Adds a POST handler.
    #[must_use]
    pub fn post<F>(self, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.on(Method::Post, handler)
    }

    /// Adds a PUT handler.
    #[must_use]
    pub fn put<F>(self, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.on(Method::Put, handler)
    }

    /// Adds a PATCH handler.
    #[must_use]
    pub fn patch<F>(self, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.on(Method::Patch, handler)
    }

    /// Adds a DELETE handler.
    #[must_use]
    pub fn delete<F>(self, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.on(Method::Delete, handler)
    }

    /// Adds a HEAD handler.
    #[must_use]
    pub fn head<F>(self, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.on(Method::Head, handler)
    }

    /// Adds an OPTIONS handler.
    #[must_use]
    pub fn options<F>(self, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        self.on(Method::Options, handler)
    }

    /// Sets the delay before the response is delivered.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the delay before the response is delivered, in milliseconds.
    #[must_use]
    pub const fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    /// Sets the status code delivered with the response.
    ///
    /// Values outside `100..=999` are not valid status codes and leave the
    /// default of 200 in place.
    #[must_use]
    pub fn status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status).filter(|&code| is_valid_status(code));
        self
    }

    /// Sets the status code from an untyped value.
    ///
    /// Values outside `100..=999` are not valid status codes and leave the
    /// default of 200 in place.
    #[must_use]
    pub fn status_code_raw(mut self, status: i64) -> Self {
        self.status_code = u16::try_from(status)
            .ok()
            .filter(|&code| is_valid_status(code));
        self
    }
}

fn is_valid_status(status: u16) -> bool {
    (100..=999).contains(&status)
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .field("status_code", &self.status_code)
            .finish()
    }
}

/// A registered route.
#[derive(Clone)]
pub struct Route {
    pattern: String,
    matcher: Arc<dyn Matcher>,
    timeout: Duration,
    status_code: u16,
    handlers: HashMap<Method, Handler>,
}

impl Route {
    pub(crate) fn new(pattern: &str, matcher: Arc<dyn Matcher>, spec: RouteSpec) -> Self {
        Self {
            pattern: pattern.to_string(),
            matcher,
            timeout: spec.timeout.unwrap_or_default(),
            status_code: spec.status_code.unwrap_or(DEFAULT_STATUS_CODE),
            handlers: spec.handlers,
        }
    }

    /// Returns the pattern this route was registered under.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled matcher.
    #[must_use]
    pub fn matcher(&self) -> &dyn Matcher {
        self.matcher.as_ref()
    }

    /// Returns the delivery delay.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the status code delivered on success.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns the handler for `method`, if any.
    #[must_use]
    pub fn handler(&self, method: &Method) -> Option<&Handler> {
        self.handlers.get(&method.normalized())
    }

    /// Returns whether the route handles `method`.
    #[must_use]
    pub fn supports(&self, method: &Method) -> bool {
        self.handlers.contains_key(&method.normalized())
    }

    /// Returns the methods this route handles.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.handlers.keys()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("matcher", &self.matcher)
            .field("timeout", &self.timeout)
            .field("status_code", &self.status_code)
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{PatternCompiler, RoutePatternCompiler};

    fn route(pattern: &str, spec: RouteSpec) -> Route {
        let matcher = RoutePatternCompiler.compile(pattern).unwrap();
        Route::new(pattern, matcher, spec)
    }

    #[test]
    fn test_defaults() {
        let route = route("/users", RouteSpec::new().get(|_| String::new()));
        assert_eq!(route.timeout(), Duration::ZERO);
        assert_eq!(route.status_code(), 200);
        assert!(route.supports(&Method::Get));
        assert!(!route.supports(&Method::Post));
    }

    #[test]
    fn test_explicit_delivery_parameters() {
        let route = route(
            "/users",
            RouteSpec::new()
                .post(|_| String::new())
                .timeout_ms(50)
                .status_code(201),
        );
        assert_eq!(route.timeout(), Duration::from_millis(50));
        assert_eq!(route.status_code(), 201);
    }

    #[test]
    fn test_invalid_raw_status_code_defaults() {
        let spec = RouteSpec::new().status_code_raw(-1);
        assert_eq!(route("/a", spec).status_code(), 200);

        let spec = RouteSpec::new().status_code_raw(70_000);
        assert_eq!(route("/a", spec).status_code(), 200);

        let spec = RouteSpec::new().status_code_raw(503);
        assert_eq!(route("/a", spec).status_code(), 503);
    }

    #[test]
    fn test_invalid_typed_status_code_defaults() {
        assert_eq!(route("/a", RouteSpec::new().status_code(0)).status_code(), 200);
        assert_eq!(route("/a", RouteSpec::new().status_code(1000)).status_code(), 200);
        assert_eq!(route("/a", RouteSpec::new().status_code(999)).status_code(), 999);
    }

    #[test]
    fn test_handler_receives_captures() {
        let route = route(
            "/users/:id",
            RouteSpec::new().get(|captures| format!("user {}", captures[0])),
        );
        let handler = route.handler(&Method::Get).unwrap();
        assert_eq!(handler(&["42".to_string()]), Ok("user 42".to_string()));
    }

    #[test]
    fn test_fallible_handler() {
        let route = route(
            "/broken",
            RouteSpec::new().try_on(Method::Get, |_| Err("boom".into())),
        );
        let handler = route.handler(&Method::Get).unwrap();
        assert_eq!(handler(&[]), Err(HandlerError::new("boom")));
    }
}
