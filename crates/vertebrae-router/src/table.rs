//! The route table.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::pattern::{PatternCompiler, RoutePatternCompiler};
use crate::route::{Route, RouteSpec};

/// Registered routes, keyed by pattern and kept in registration order.
///
/// # Example
///
/// ```
/// use vertebrae_router::{RouteSpec, RouteTable};
///
/// let mut table = RouteTable::new();
/// table
///     .register_routes([
///         ("/valid.json", RouteSpec::new().get(|_| r#"{"id":0}"#.to_string())),
///         ("/users/:id", RouteSpec::new().get(|c| c[0].clone())),
///     ])
///     .unwrap();
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Clone)]
pub struct RouteTable {
    compiler: Arc<dyn PatternCompiler>,
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// Creates an empty table using [`RoutePatternCompiler`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_compiler(RoutePatternCompiler)
    }

    /// Creates an empty table using the given pattern compiler.
    #[must_use]
    pub fn with_compiler(compiler: impl PatternCompiler + 'static) -> Self {
        Self {
            compiler: Arc::new(compiler),
            routes: Vec::new(),
        }
    }

    /// Registers a route under `pattern`.
    ///
    /// Registering a pattern that already exists replaces the previous
    /// route entirely, keeping its position in the scan order.
    ///
    /// # Errors
    ///
    /// Returns the compiler's error if `pattern` cannot be compiled. The
    /// table is left unchanged in that case.
    pub fn register(&mut self, pattern: &str, spec: RouteSpec) -> Result<()> {
        let matcher = self.compiler.compile(pattern)?;
        let route = Route::new(pattern, matcher, spec);

        debug!(
            pattern,
            timeout = ?route.timeout(),
            status_code = route.status_code(),
            "registered mock route"
        );

        match self.routes.iter_mut().find(|r| r.pattern() == pattern) {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }
        Ok(())
    }

    /// Registers several routes in iteration order.
    ///
    /// # Errors
    ///
    /// Stops at the first pattern that fails to compile and returns its
    /// error. Routes registered before it remain in the table.
    pub fn register_routes<I, P>(&mut self, routes: I) -> Result<()>
    where
        I: IntoIterator<Item = (P, RouteSpec)>,
        P: AsRef<str>,
    {
        for (pattern, spec) in routes {
            self.register(pattern.as_ref(), spec)?;
        }
        Ok(())
    }

    /// Returns the route registered under `pattern`.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.pattern() == pattern)
    }

    /// Removes and returns the route registered under `pattern`.
    pub fn remove(&mut self, pattern: &str) -> Option<Route> {
        let index = self.routes.iter().position(|r| r.pattern() == pattern)?;
        Some(self.routes.remove(index))
    }

    /// Removes every route.
    pub fn clear(&mut self) {
        self.routes.clear();
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates routes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Iterates registered patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(Route::pattern)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::RouterError;
    use crate::method::Method;
    use crate::pattern::RegexCompiler;

    fn text(body: &'static str) -> impl Fn(&[String]) -> String + Send + Sync + 'static {
        move |_| body.to_string()
    }

    #[test]
    fn test_register_preserves_order() {
        let mut table = RouteTable::new();
        table
            .register_routes([
                ("/b", RouteSpec::new().get(text("b"))),
                ("/a", RouteSpec::new().get(text("a"))),
                ("/c", RouteSpec::new().get(text("c"))),
            ])
            .unwrap();

        assert_eq!(table.patterns().collect::<Vec<_>>(), vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_reregistration_replaces_route() {
        let mut table = RouteTable::new();
        table
            .register("/a", RouteSpec::new().get(text("a")).timeout_ms(10))
            .unwrap();
        table.register("/b", RouteSpec::new().get(text("b"))).unwrap();
        table.register("/a", RouteSpec::new().post(text("a2"))).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.patterns().collect::<Vec<_>>(), vec!["/a", "/b"]);

        let route = table.get("/a").unwrap();
        assert!(!route.supports(&Method::Get));
        assert!(route.supports(&Method::Post));
        assert_eq!(route.timeout(), Duration::ZERO);
    }

    #[test]
    fn test_failed_registration_leaves_table_unchanged() {
        let mut table = RouteTable::new();
        table.register("/a(", RouteSpec::new()).unwrap_err();
        assert!(table.is_empty());

        table.register("/a", RouteSpec::new().get(text("a"))).unwrap();
        let err = table.register("/a)", RouteSpec::new()).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bulk_registration_stops_at_first_error() {
        let mut table = RouteTable::new();
        let result = table.register_routes([
            ("/ok", RouteSpec::new()),
            ("/bad(", RouteSpec::new()),
            ("/never", RouteSpec::new()),
        ]);

        assert!(result.is_err());
        assert_eq!(table.patterns().collect::<Vec<_>>(), vec!["/ok"]);
    }

    #[test]
    fn test_custom_compiler() {
        let mut table = RouteTable::with_compiler(RegexCompiler);
        table
            .register(r"^/items/(\d+)$", RouteSpec::new().get(text("item")))
            .unwrap();
        assert!(table.register("[", RouteSpec::new()).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut table = RouteTable::new();
        table
            .register_routes([("/a", RouteSpec::new()), ("/b", RouteSpec::new())])
            .unwrap();

        assert!(table.remove("/a").is_some());
        assert!(table.remove("/a").is_none());
        assert_eq!(table.len(), 1);

        table.clear();
        assert!(table.is_empty());
    }
}
