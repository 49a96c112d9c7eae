//! HTTP request methods.

use std::fmt;
use std::str::FromStr;

use crate::error::RouterError;

/// HTTP request methods.
///
/// Parsing is case-insensitive; every method is stored and displayed in
/// upper case so `"get"` and `"GET"` select the same handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
    /// Any other method token, upper-cased.
    Other(String),
}

impl Method {
    /// Parses a method from a string, normalizing it to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidMethod`] if `s` is empty or is not a
    /// valid HTTP token.
    pub fn parse(s: &str) -> Result<Self, RouterError> {
        let token = s.trim();
        if token.is_empty() || !token.bytes().all(is_tchar) {
            return Err(RouterError::InvalidMethod(s.to_string()));
        }

        Ok(match token.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            other => Self::Other(other.to_string()),
        })
    }

    /// Returns the method as an upper-case string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Other(token) => token,
        }
    }

    /// Returns the canonical form of this method.
    ///
    /// A hand-built [`Method::Other`] may hold any spelling; this upper-cases
    /// it and maps standard names to their variants, so `Other("get")`
    /// becomes `Get`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        match self {
            Self::Other(token) => {
                Self::parse(token).unwrap_or_else(|_| Self::Other(token.to_ascii_uppercase()))
            }
            standard => standard.clone(),
        }
    }

    /// Returns whether request parameters travel in the query string.
    ///
    /// Only GET and HEAD carry no body; every other method sends its
    /// parameters in the body.
    #[must_use]
    pub const fn params_in_query(&self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }
}

impl FromStr for Method {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// RFC 9110 token characters
const fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
