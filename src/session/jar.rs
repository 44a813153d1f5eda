//! Session cookie jar for clients without native cookie support.
//!
//! [`SessionJar`] sits between an HTTP client and a key-value store:
//!
//! 1. Before a request, [`SessionJar::prepare_request`] adds the stored
//!    cookies and the app `Origin`.
//! 2. After a response, [`SessionJar::handle_response`] folds application
//!    `Set-Cookie` headers into the stored snapshot and notifies the
//!    listener when the session itself changed.
//!
//! The read-modify-write of step 2 is not locked. Callers sharing one jar
//! across threads must serialize responses themselves.

use crate::base::cookieerror::CookieError;
use crate::cookies::sessiondiff::has_session_cookie_changed;
use crate::cookies::snapshot::{merge_set_cookie, render_cookie_header};
use crate::session::config::SessionConfig;
use crate::session::event::{SessionEvent, SessionListener};
use crate::storage::{KeyValueStorage, NormalizedStorage};
use http::header::{COOKIE, ORIGIN, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use std::borrow::Cow;
use std::sync::Arc;
use time::OffsetDateTime;

const SIGN_OUT_PATH: &str = "/sign-out";
const GET_SESSION_PATH: &str = "/get-session";
const EMPTY_SNAPSHOT: &str = "{}";

/// Persists session cookies for one app in a [`KeyValueStorage`].
pub struct SessionJar<S> {
    storage: NormalizedStorage<S>,
    config: SessionConfig,
    listener: Option<Arc<dyn SessionListener>>,
}

impl<S: KeyValueStorage> SessionJar<S> {
    pub fn new(storage: S, config: SessionConfig) -> Self {
        Self {
            storage: NormalizedStorage::new(storage),
            config,
            listener: None,
        }
    }

    /// Register the receiver of [`SessionEvent`]s.
    pub fn with_listener(mut self, listener: impl SessionListener + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn storage(&self) -> &NormalizedStorage<S> {
        &self.storage
    }

    /// The `Cookie` header value for the next request.
    pub fn cookie_header(&self) -> String {
        self.cookie_header_at(OffsetDateTime::now_utc())
    }

    pub fn cookie_header_at(&self, now: OffsetDateTime) -> String {
        let stored = self
            .read(&self.config.cookie_key())
            .unwrap_or_else(|| EMPTY_SNAPSHOT.to_string());
        render_cookie_header(&stored, now)
    }

    /// Add `Cookie` and `Origin` to an outgoing request.
    ///
    /// A request to a sign-out endpoint still carries the current cookies,
    /// but the stored cookies and session cache are cleared before it is sent.
    pub fn prepare_request(&self, url: &str, headers: &mut HeaderMap) -> Result<(), CookieError> {
        self.prepare_request_at(url, headers, OffsetDateTime::now_utc())
    }

    pub fn prepare_request_at(
        &self,
        url: &str,
        headers: &mut HeaderMap,
        now: OffsetDateTime,
    ) -> Result<(), CookieError> {
        // Stored values may carry obs-text, so they go back out as raw bytes.
        let cookie = HeaderValue::from_bytes(self.cookie_header_at(now).as_bytes())
            .map_err(|_| CookieError::invalid_header_value(COOKIE.as_str()))?;
        let origin = HeaderValue::from_bytes(self.config.origin().as_bytes())
            .map_err(|_| CookieError::invalid_header_value(ORIGIN.as_str()))?;

        if url.contains(SIGN_OUT_PATH) {
            tracing::debug!("sign-out request, clearing stored session");
            self.clear();
            self.notify(SessionEvent::SignedOut);
        }

        headers.insert(COOKIE, cookie);
        headers.insert(ORIGIN, origin);
        Ok(())
    }

    /// Process a successful response.
    ///
    /// Returns the event that was emitted, if any. `body` is the decoded
    /// response body; it is cached for `/get-session` responses.
    pub fn handle_response(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Option<SessionEvent> {
        self.handle_response_at(url, headers, body, OffsetDateTime::now_utc())
    }

    pub fn handle_response_at(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: Option<&serde_json::Value>,
        now: OffsetDateTime,
    ) -> Option<SessionEvent> {
        let event = joined_set_cookie(headers)
            .and_then(|set_cookie| self.store_set_cookie_at(&set_cookie, now));

        if url.contains(GET_SESSION_PATH) && !self.config.disable_cache {
            if let Some(body) = body {
                self.cache_session(body);
            }
        }

        event
    }

    /// Fold a raw `Set-Cookie` header into the stored snapshot.
    ///
    /// Headers without application cookies are ignored. Returns
    /// `Some(SessionChanged)` when a session cookie value changed.
    pub fn store_set_cookie(&self, set_cookie: &str) -> Option<SessionEvent> {
        self.store_set_cookie_at(set_cookie, OffsetDateTime::now_utc())
    }

    pub fn store_set_cookie_at(&self, set_cookie: &str, now: OffsetDateTime) -> Option<SessionEvent> {
        if !self.config.cookie_prefix.matches_header(set_cookie) {
            tracing::trace!("ignoring Set-Cookie without application cookies");
            return None;
        }
        if self.config.debug {
            tracing::debug!(set_cookie = %set_cookie, "storing application cookies");
        }

        let key = self.config.cookie_key();
        let previous = self.read(&key);
        let next = merge_set_cookie(set_cookie, previous.as_deref(), now);
        let changed = has_session_cookie_changed(previous.as_deref(), &next);
        self.write(&key, &next);

        if !changed {
            tracing::trace!("session cookies refreshed without change");
            return None;
        }
        tracing::debug!("session cookies changed");
        self.notify(SessionEvent::SessionChanged);
        Some(SessionEvent::SessionChanged)
    }

    /// The last cached `/get-session` body.
    ///
    /// `None` if nothing is cached, the cache is unreadable, or it was
    /// emptied by a sign-out.
    pub fn cached_session(&self) -> Option<serde_json::Value> {
        let text = self.read(&self.config.session_cache_key())?;
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Object(map)) if map.is_empty() => None,
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(error = %e, "discarding unreadable session cache");
                None
            }
        }
    }

    /// Drop the stored cookies and the cached session.
    pub fn clear(&self) {
        self.write(&self.config.cookie_key(), EMPTY_SNAPSHOT);
        self.write(&self.config.session_cache_key(), EMPTY_SNAPSHOT);
    }

    fn cache_session(&self, body: &serde_json::Value) {
        match serde_json::to_string(body) {
            Ok(text) => self.write(&self.config.session_cache_key(), &text),
            Err(e) => tracing::warn!(error = %e, "failed to encode session cache"),
        }
    }

    fn notify(&self, event: SessionEvent) {
        if let Some(listener) = &self.listener {
            listener.on_session_event(event);
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "storage read failed");
            None
        })
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            tracing::warn!(key = %key, error = %e, "storage write failed");
        }
    }
}

/// All `Set-Cookie` values joined with `", "`, as a fetch client reports them.
///
/// Non-UTF-8 bytes are replaced rather than dropping the whole value.
fn joined_set_cookie(headers: &HeaderMap) -> Option<String> {
    let values: Vec<Cow<'_, str>> = headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}
