//! Persisted cookie snapshots.
//!
//! A snapshot is the whole set of cookies kept for one storage key, stored
//! as JSON text:
//!
//! ```json
//! {"better-auth.session_token":{"value":"abc","expires":"2025-01-01T01:00:00.000Z"}}
//! ```
//!
//! The text is decoded into [`CookieSnapshot`] at the boundary and never
//! handled as untyped JSON past that point.

use crate::base::cookieerror::CookieError;
use crate::cookies::expiry::resolve_expiry;
use crate::cookies::setcookie::parse_set_cookie_header;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// A single persisted cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub value: String,
    /// `None` is a session cookie that never expires client-side.
    #[serde(default, with = "iso_instant")]
    pub expires: Option<OffsetDateTime>,
}

impl StoredCookie {
    pub fn new(value: impl Into<String>, expires: Option<OffsetDateTime>) -> Self {
        Self {
            value: value.into(),
            expires,
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expiry| expiry < now)
    }
}

/// Cookie name → [`StoredCookie`] mapping, at most one entry per name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieSnapshot {
    cookies: BTreeMap<String, StoredCookie>,
}

impl CookieSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from one `Set-Cookie` header, resolving expiries at `now`.
    pub fn from_set_cookie(header: &str, now: OffsetDateTime) -> Self {
        let cookies = parse_set_cookie_header(header)
            .into_iter()
            .map(|(name, attrs)| {
                let expires = resolve_expiry(&attrs, now);
                (name, StoredCookie::new(attrs.value, expires))
            })
            .collect();
        Self { cookies }
    }

    pub fn from_json(text: &str) -> Result<Self, CookieError> {
        serde_json::from_str(text).map_err(CookieError::invalid_snapshot)
    }

    /// Decode persisted text, falling back to an empty snapshot.
    pub fn from_json_lossy(text: &str) -> Self {
        Self::from_json(text).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "discarding unreadable cookie snapshot");
            Self::default()
        })
    }

    pub fn to_json(&self) -> Result<String, CookieError> {
        serde_json::to_string(self).map_err(CookieError::snapshot_encode)
    }

    pub fn get(&self, name: &str) -> Option<&StoredCookie> {
        self.cookies.get(name)
    }

    /// Insert or replace the cookie called `name`.
    pub fn insert(&mut self, name: impl Into<String>, cookie: StoredCookie) -> Option<StoredCookie> {
        self.cookies.insert(name.into(), cookie)
    }

    pub fn remove(&mut self, name: &str) -> Option<StoredCookie> {
        self.cookies.remove(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cookies.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, StoredCookie> {
        self.cookies.iter()
    }

    /// Overlay `newer` on this snapshot. Entries from `newer` replace entries
    /// with the same name; all other entries are kept.
    pub fn merge(&mut self, newer: CookieSnapshot) {
        self.cookies.extend(newer.cookies);
    }

    /// Render the unexpired cookies as a `Cookie` request header value.
    pub fn render(&self, now: OffsetDateTime) -> String {
        self.cookies
            .iter()
            .filter(|(_, cookie)| !cookie.is_expired(now))
            .map(|(name, cookie)| format!("{}={}", name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<'a> IntoIterator for &'a CookieSnapshot {
    type Item = (&'a String, &'a StoredCookie);
    type IntoIter = btree_map::Iter<'a, String, StoredCookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.iter()
    }
}

impl FromIterator<(String, StoredCookie)> for CookieSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, StoredCookie)>>(iter: I) -> Self {
        Self {
            cookies: iter.into_iter().collect(),
        }
    }
}

/// Merge a `Set-Cookie` header over a previously persisted snapshot and
/// return the new snapshot text.
///
/// An unreadable `previous` is treated as empty.
pub fn merge_set_cookie(header: &str, previous: Option<&str>, now: OffsetDateTime) -> String {
    let fresh = CookieSnapshot::from_set_cookie(header, now);

    let mut snapshot = previous
        .map(CookieSnapshot::from_json_lossy)
        .unwrap_or_default();
    snapshot.merge(fresh);

    snapshot.to_json().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to encode cookie snapshot");
        String::from("{}")
    })
}

/// Render persisted snapshot text as a `Cookie` header, dropping cookies that
/// expired before `now`. Returns `""` when nothing is left.
pub fn render_cookie_header(snapshot: &str, now: OffsetDateTime) -> String {
    CookieSnapshot::from_json_lossy(snapshot).render(now)
}

/// ISO-8601 instants with millisecond precision, e.g. `2025-01-01T01:00:00.000Z`.
mod iso_instant {
    use serde::{ser, Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::format_description::BorrowedFormatItem;
    use time::macros::format_description;
    use time::{Duration, OffsetDateTime, UtcOffset};

    const FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );

    const NANOS_PER_MILLI: u32 = 1_000_000;

    /// Round up to whole milliseconds so the stored instant is never earlier
    /// than the computed one.
    pub(super) fn ceil_to_millisecond(at: OffsetDateTime) -> OffsetDateTime {
        let remainder = at.nanosecond() % NANOS_PER_MILLI;
        if remainder == 0 {
            return at;
        }
        at.checked_add(Duration::nanoseconds(i64::from(NANOS_PER_MILLI - remainder)))
            .unwrap_or(at)
    }

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => {
                let text = ceil_to_millisecond(at.to_offset(UtcOffset::UTC))
                    .format(FORMAT)
                    .map_err(ser::Error::custom)?;
                serializer.serialize_str(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    // An instant that does not parse is read as already expired.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text: Option<String> = Option::deserialize(deserializer)?;
        Ok(text.map(|s| {
            OffsetDateTime::parse(&s, &Rfc3339).unwrap_or(OffsetDateTime::UNIX_EPOCH)
        }))
    }
}
