//! Application cookie detection.
//!
//! Responses often carry third-party cookies (CDN, load balancer) next to
//! the application's own. Persisting on those would trigger a refetch loop,
//! so a header is only accepted when one of its cookies belongs to the
//! configured namespace.

use crate::cookies::sessiondiff::SESSION_COOKIE_MARKERS;
use crate::cookies::setcookie::parse_set_cookie_header;

/// Marker a browser-style `Secure` prefix adds in front of the cookie name.
pub const SECURE_PREFIX: &str = "__Secure-";

/// One or more cookie name prefixes.
///
/// An empty prefix switches to suffix matching: names ending in
/// `session_token` or `session_data` match. An empty list matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePrefix(Vec<String>);

impl CookiePrefix {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(prefixes.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether a single cookie name belongs to one of the prefixes.
    pub fn matches_name(&self, name: &str) -> bool {
        let name = strip_secure_prefix(name);
        self.0.iter().any(|prefix| {
            if prefix.is_empty() {
                SESSION_COOKIE_MARKERS
                    .iter()
                    .any(|suffix| name.ends_with(suffix))
            } else {
                name.starts_with(prefix.as_str())
            }
        })
    }

    /// Whether any cookie set by `header` belongs to one of the prefixes.
    pub fn matches_header(&self, header: &str) -> bool {
        parse_set_cookie_header(header)
            .keys()
            .any(|name| self.matches_name(name))
    }
}

impl Default for CookiePrefix {
    fn default() -> Self {
        Self::from("better-auth")
    }
}

impl From<&str> for CookiePrefix {
    fn from(prefix: &str) -> Self {
        Self(vec![prefix.to_string()])
    }
}

impl From<String> for CookiePrefix {
    fn from(prefix: String) -> Self {
        Self(vec![prefix])
    }
}

impl From<Vec<String>> for CookiePrefix {
    fn from(prefixes: Vec<String>) -> Self {
        Self(prefixes)
    }
}

impl From<Vec<&str>> for CookiePrefix {
    fn from(prefixes: Vec<&str>) -> Self {
        Self::new(prefixes)
    }
}

impl From<&[&str]> for CookiePrefix {
    fn from(prefixes: &[&str]) -> Self {
        Self::new(prefixes.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for CookiePrefix {
    fn from(prefixes: [&str; N]) -> Self {
        Self::new(prefixes)
    }
}

/// Remove a leading `__Secure-` marker, if present.
pub fn strip_secure_prefix(name: &str) -> &str {
    name.strip_prefix(SECURE_PREFIX).unwrap_or(name)
}

/// Whether `header` sets at least one cookie in the `prefix` namespace.
pub fn has_prefixed_cookies(header: &str, prefix: impl Into<CookiePrefix>) -> bool {
    prefix.into().matches_header(header)
}
