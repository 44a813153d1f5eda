//! Session change detection.
//!
//! Every authenticated response refreshes the session cookie's expiry, so a
//! naive snapshot comparison would report a change on each request. Only the
//! values of session cookies are compared here.

use crate::cookies::snapshot::CookieSnapshot;
use std::collections::BTreeSet;

/// Name fragments that mark a cookie as carrying session state.
pub const SESSION_COOKIE_MARKERS: [&str; 2] = ["session_token", "session_data"];

/// Whether `name` contains one of the session markers anywhere.
pub fn is_session_cookie_name(name: &str) -> bool {
    SESSION_COOKIE_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
}

/// Whether the session cookies differ in value between two snapshots.
///
/// Expiry differences are ignored. A missing or unreadable snapshot on either
/// side counts as a change.
pub fn has_session_cookie_changed(previous: Option<&str>, next: &str) -> bool {
    let previous = match previous {
        Some(text) if !text.is_empty() => text,
        _ => return true,
    };

    match (
        CookieSnapshot::from_json(previous),
        CookieSnapshot::from_json(next),
    ) {
        (Ok(prev), Ok(next)) => session_values_differ(&prev, &next),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!(error = %e, "treating unreadable snapshot as a session change");
            true
        }
    }
}

/// Typed form of [`has_session_cookie_changed`].
pub fn session_values_differ(prev: &CookieSnapshot, next: &CookieSnapshot) -> bool {
    let session_names: BTreeSet<&str> = prev
        .names()
        .chain(next.names())
        .filter(|name| is_session_cookie_name(name))
        .collect();

    session_names.into_iter().any(|name| {
        let before = prev.get(name).map(|c| c.value.as_str());
        let after = next.get(name).map(|c| c.value.as_str());
        before != after
    })
}
