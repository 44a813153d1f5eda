//! Expiry resolution for parsed cookies.
//!
//! `Max-Age` wins over `Expires`. Anything that cannot be understood
//! resolves to "no expiry" instead of an error.

use crate::cookies::setcookie::RawCookieAttributes;
use cookie::Cookie;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{Duration, OffsetDateTime};

/// Largest `Max-Age` magnitude (in seconds) that is applied as an offset.
/// Larger values saturate.
const MAX_AGE_LIMIT_SECS: f64 = 1.0e11;

/// Compute the absolute expiry of a cookie, or `None` for a session cookie.
///
/// A zero or negative `Max-Age` yields an instant at or before `now`; callers
/// filter such cookies as expired.
pub fn resolve_expiry(attrs: &RawCookieAttributes, now: OffsetDateTime) -> Option<OffsetDateTime> {
    if let Some(secs) = attrs.max_age.as_deref().and_then(parse_max_age) {
        return offset_by_seconds(now, secs);
    }

    attrs.expires.as_deref().and_then(parse_cookie_date)
}

/// Parse a `Max-Age` value. Fractional and negative values are accepted.
pub fn parse_max_age(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|secs| secs.is_finite())
}

/// Parse an `Expires` date.
///
/// Accepts the cookie date formats (RFC 1123, RFC 850, asctime), then falls
/// back to RFC 3339 and RFC 2822.
pub fn parse_cookie_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let from_cookie = Cookie::parse(format!("d=; Expires={}", raw))
        .ok()
        .and_then(|c| c.expires_datetime());
    if from_cookie.is_some() {
        return from_cookie;
    }

    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc2822))
        .ok()
}

fn offset_by_seconds(now: OffsetDateTime, secs: f64) -> Option<OffsetDateTime> {
    let shifted = if secs.abs() <= MAX_AGE_LIMIT_SECS {
        now.checked_add(Duration::seconds_f64(secs))
    } else {
        None
    };

    match shifted {
        Some(at) if (0..=9999).contains(&at.year()) => Some(at),
        _ if secs < 0.0 => Some(OffsetDateTime::UNIX_EPOCH),
        _ => None,
    }
}
