//! Route pattern compilation.
//!
//! A [`PatternCompiler`] turns a route pattern string into a [`Matcher`]
//! that can test a URL and extract positional captures from it. The
//! default [`RoutePatternCompiler`] understands route-style patterns:
//!
//! - `/users` - literal path
//! - `/users/:id` - named parameter, matches one path segment
//! - `/files/*path` - splat parameter, matches the rest of the path
//! - `/docs(/:section)` - optional part
//!
//! A trailing query string on the URL is tolerated and never captured.
//! Captures hold only path parameters; unlike Backbone 1.1, which appends
//! the query string as a final capture, the query is left out deliberately.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, RouterError};

/// A compiled URL pattern.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns whether `url` matches this pattern.
    fn is_match(&self, url: &str) -> bool;

    /// Returns the sub-group captures for `url`, or `None` if it does not
    /// match. The whole-match element is never included.
    fn captures(&self, url: &str) -> Option<Vec<String>>;
}

/// Turns pattern strings into matchers.
pub trait PatternCompiler: Send + Sync {
    /// Compiles `pattern` into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] if the pattern cannot be
    /// compiled.
    fn compile(&self, pattern: &str) -> Result<Arc<dyn Matcher>>;
}

/// A regex-backed matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// The original pattern string.
    pattern: String,
    /// Compiled regex for matching.
    regex: Regex,
    /// Parameter names in capture order. Empty for raw regex patterns.
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// Returns the original pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the generated regular expression.
    #[must_use]
    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns the parameter names.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }
}

impl Matcher for CompiledPattern {
    fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    fn captures(&self, url: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(url)?;

        // Groups that did not participate (inside an optional part) become
        // empty strings so later captures keep their position.
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}

/// Compiles route-style patterns (`/users/:id`, `/files/*path`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutePatternCompiler;

impl RoutePatternCompiler {
    /// Compiles `pattern` into a concrete [`CompiledPattern`].
    ///
    /// # Example
    ///
    /// ```
    /// use vertebrae_router::{Matcher, RoutePatternCompiler};
    ///
    /// let pattern = RoutePatternCompiler.build("/posts/:id/comments/:comment_id").unwrap();
    /// let captures = pattern.captures("/posts/123/comments/456").unwrap();
    /// assert_eq!(captures, vec!["123", "456"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] on unbalanced parentheses or
    /// if the generated expression is rejected by the regex engine.
    pub fn build(&self, pattern: &str) -> Result<CompiledPattern> {
        let mut param_names = Vec::new();
        let mut regex_str = String::from("^");
        let mut depth = 0usize;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                ':' | '*' if chars.peek().copied().is_some_and(is_name_char) => {
                    let mut name = String::new();
                    while let Some(&next) = chars.peek() {
                        if !is_name_char(next) {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }
                    regex_str.push_str(if c == ':' { "([^/?]+)" } else { "([^?]*?)" });
                    param_names.push(name);
                }
                '(' => {
                    depth += 1;
                    regex_str.push_str("(?:");
                }
                ')' => {
                    if depth == 0 {
                        return Err(RouterError::invalid_pattern(pattern, "unbalanced ')'"));
                    }
                    depth -= 1;
                    regex_str.push_str(")?");
                }
                _ => {
                    let mut buf = [0u8; 4];
                    regex_str.push_str(&regex::escape(c.encode_utf8(&mut buf)));
                }
            }
        }

        if depth != 0 {
            return Err(RouterError::invalid_pattern(pattern, "unclosed '('"));
        }

        regex_str.push_str(r"(?:\?[\s\S]*)?$");

        let regex = Regex::new(&regex_str)
            .map_err(|e| RouterError::invalid_pattern(pattern, e.to_string()))?;

        Ok(CompiledPattern {
            pattern: pattern.to_string(),
            regex,
            param_names,
        })
    }
}

impl PatternCompiler for RoutePatternCompiler {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn Matcher>> {
        Ok(Arc::new(self.build(pattern)?))
    }
}

/// Treats every pattern as a raw regular expression.
///
/// Every capture group of the expression is forwarded to the handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCompiler;

impl PatternCompiler for RegexCompiler {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn Matcher>> {
        let regex =
            Regex::new(pattern).map_err(|e| RouterError::invalid_pattern(pattern, e.to_string()))?;
        Ok(Arc::new(CompiledPattern {
            pattern: pattern.to_string(),
            regex,
            param_names: Vec::new(),
        }))
    }
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> CompiledPattern {
        RoutePatternCompiler.build(pattern).unwrap()
    }

    #[test]
    fn test_literal_path() {
        let pattern = compile("/users");
        assert!(pattern.is_match("/users"));
        assert!(!pattern.is_match("/users/"));
        assert!(!pattern.is_match("/posts"));
        assert_eq!(pattern.captures("/users"), Some(vec![]));
    }

    #[test]
    fn test_single_param() {
        let pattern = compile("/users/:id");
        assert_eq!(pattern.captures("/users/42"), Some(vec!["42".to_string()]));
        assert_eq!(pattern.param_names(), &["id".to_string()]);
        assert!(!pattern.is_match("/users/42/posts"));
    }

    #[test]
    fn test_multiple_params() {
        let pattern = compile("/posts/:post_id/comments/:comment_id");
        let captures = pattern.captures("/posts/42/comments/7").unwrap();
        assert_eq!(captures, vec!["42", "7"]);
    }

    #[test]
    fn test_splat_param() {
        let pattern = compile("/files/*path");
        let captures = pattern.captures("/files/docs/readme.md").unwrap();
        assert_eq!(captures, vec!["docs/readme.md"]);
    }

    #[test]
    fn test_optional_part() {
        let pattern = compile("/docs(/:section)");
        assert_eq!(pattern.captures("/docs/intro"), Some(vec!["intro".to_string()]));
        assert_eq!(pattern.captures("/docs"), Some(vec![String::new()]));
    }

    #[test]
    fn test_query_string_is_ignored() {
        let pattern = compile("/users/:id");
        assert_eq!(
            pattern.captures("/users/42?expand=true"),
            Some(vec!["42".to_string()])
        );
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let pattern = compile("/valid.json");
        assert!(pattern.is_match("/valid.json"));
        assert!(!pattern.is_match("/validxjson"));
    }

    #[test]
    fn test_bare_colon_is_literal() {
        let pattern = compile("/time/12:/now");
        assert!(pattern.is_match("/time/12:/now"));
        assert!(pattern.param_names().is_empty());
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(matches!(
            RoutePatternCompiler.build("/docs(/:section"),
            Err(RouterError::InvalidPattern { .. })
        ));
        assert!(matches!(
            RoutePatternCompiler.build("/docs)"),
            Err(RouterError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_regex_compiler() {
        let matcher = RegexCompiler.compile(r"^/items/(\d+)$").unwrap();
        assert_eq!(matcher.captures("/items/12"), Some(vec!["12".to_string()]));
        assert!(!matcher.is_match("/items/ab"));
        assert!(RegexCompiler.compile("/items/(").is_err());
    }
}
