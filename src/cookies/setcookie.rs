//! `Set-Cookie` header splitting and attribute parsing.
//!
//! Fetch-style clients join multiple `Set-Cookie` headers into one string
//! with `", "`, which collides with the comma inside RFC 1123 dates
//! (`Expires=Wed, 21 Oct 2015 07:28:00 GMT`). The splitter tells the two
//! apart by looking at the cookie accumulated so far.

use std::collections::BTreeMap;

/// Raw attributes of one cookie, exactly as they appeared after `=`.
///
/// Flag attributes (`Secure`, `HttpOnly`) are stored as an empty string.
/// Attributes not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCookieAttributes {
    pub value: String,
    pub expires: Option<String>,
    pub max_age: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: Option<String>,
    pub http_only: Option<String>,
    pub same_site: Option<String>,
}

impl RawCookieAttributes {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Store an attribute by its lower-cased name. Unknown names are dropped.
    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "expires" => &mut self.expires,
            "max-age" => &mut self.max_age,
            "domain" => &mut self.domain,
            "path" => &mut self.path,
            "secure" => &mut self.secure,
            "httponly" => &mut self.http_only,
            "samesite" => &mut self.same_site,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// Split a raw `Set-Cookie` header into individual trimmed cookie strings.
///
/// A comma continues the current cookie while it has an `Expires=` attribute
/// whose date has not reached `GMT` yet; any other comma ends the cookie.
pub fn split_set_cookie_header(header: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut chars = header.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ',' {
            buffer.push(c);
            continue;
        }

        let recent = buffer.to_ascii_lowercase();
        if recent.contains("expires=") && !recent.contains("gmt") {
            buffer.push(c);
            continue;
        }

        flush(&mut buffer, &mut parts);
        if chars.peek() == Some(&' ') {
            chars.next();
        }
    }
    flush(&mut buffer, &mut parts);

    parts
}

fn flush(buffer: &mut String, parts: &mut Vec<String>) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    buffer.clear();
}

/// Parse one cookie string (`name=value; Attr=val; Flag`).
///
/// Returns `None` when the first segment has no `=` or an empty name.
pub fn parse_cookie(cookie: &str) -> Option<(String, RawCookieAttributes)> {
    let mut segments = cookie.split(';').map(str::trim);

    let (name, value) = segments.next()?.split_once('=')?;
    if name.is_empty() {
        return None;
    }

    let mut attrs = RawCookieAttributes::new(value);
    for segment in segments {
        let (attr_name, attr_value) = segment.split_once('=').unwrap_or((segment, ""));
        attrs.set(
            &attr_name.trim().to_ascii_lowercase(),
            attr_value.to_string(),
        );
    }

    Some((name.to_string(), attrs))
}

/// Parse a full `Set-Cookie` header into a name → attributes map.
///
/// When the same name appears more than once the last definition wins.
pub fn parse_set_cookie_header(header: &str) -> BTreeMap<String, RawCookieAttributes> {
    let mut cookies = BTreeMap::new();
    for part in split_set_cookie_header(header) {
        match parse_cookie(&part) {
            Some((name, attrs)) => {
                cookies.insert(name, attrs);
            }
            None => tracing::trace!(cookie = %part, "dropping cookie without a name"),
        }
    }
    cookies
}
