//! Request-to-route resolution.

use crate::error::RouterError;
use crate::method::Method;
use crate::route::Route;
use crate::table::RouteTable;

/// The outcome of resolving a request against a [`RouteTable`].
#[derive(Debug, Clone)]
pub enum MatchResult {
    /// No route matches the URL with a handler for the method.
    NoMatch,
    /// The first route that matches both URL and method.
    Matched {
        /// The matched route.
        route: Route,
        /// Sub-group captures extracted from the URL.
        captures: Vec<String>,
    },
}

impl MatchResult {
    /// Returns whether a route was found.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Returns the matched route.
    #[must_use]
    pub const fn route(&self) -> Option<&Route> {
        match self {
            Self::Matched { route, .. } => Some(route),
            Self::NoMatch => None,
        }
    }

    /// Returns the captures of the matched route, empty on no match.
    #[must_use]
    pub fn captures(&self) -> &[String] {
        match self {
            Self::Matched { captures, .. } => captures,
            Self::NoMatch => &[],
        }
    }
}

/// Finds the first route, in registration order, whose pattern matches
/// `url` and which has a handler for `method`.
///
/// A route whose pattern matches but which lacks a handler for `method`
/// is skipped, and the scan continues with the next route.
///
/// # Example
///
/// ```
/// use vertebrae_router::{resolve, Method, RouteSpec, RouteTable};
///
/// let mut table = RouteTable::new();
/// table.register("/users/:id", RouteSpec::new().get(|c| c[0].clone())).unwrap();
///
/// let result = resolve(&table, "/users/42", &Method::Get);
/// assert_eq!(result.captures(), ["42"]);
/// assert!(!resolve(&table, "/users/42", &Method::Post).is_match());
/// ```
#[must_use]
pub fn resolve(table: &RouteTable, url: &str, method: &Method) -> MatchResult {
    table
        .iter()
        .filter(|route| route.supports(method))
        .find_map(|route| {
            route
                .matcher()
                .captures(url)
                .map(|captures| MatchResult::Matched {
                    route: route.clone(),
                    captures,
                })
        })
        .unwrap_or(MatchResult::NoMatch)
}

/// Resolves with an untyped method name.
///
/// An unparseable method can never have a handler, so it resolves to
/// [`MatchResult::NoMatch`].
#[must_use]
pub fn resolve_str(table: &RouteTable, url: &str, method: &str) -> MatchResult {
    Method::parse(method).map_or(MatchResult::NoMatch, |method| {
        resolve(table, url, &method)
    })
}

/// Explains why `url` + `method` did not resolve.
///
/// Returns [`RouterError::MethodNotAllowed`] if some route matches the URL
/// without handling the method, and [`RouterError::NotFound`] otherwise.
#[must_use]
pub fn diagnose(table: &RouteTable, url: &str, method: &Method) -> RouterError {
    let url_matched = table.iter().any(|route| route.matcher().is_match(url));

    if url_matched {
        RouterError::MethodNotAllowed {
            method: method.to_string(),
            url: url.to_string(),
        }
    } else {
        RouterError::NotFound {
            method: method.to_string(),
            url: url.to_string(),
        }
    }
}
