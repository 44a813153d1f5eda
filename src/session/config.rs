//! Session client configuration.

use crate::cookies::prefix::CookiePrefix;

/// Storage prefix used when none (or an empty one) is configured.
pub const DEFAULT_STORAGE_PREFIX: &str = "better-auth";

/// Configuration for [`SessionJar`](crate::session::jar::SessionJar).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// App URL scheme; requests carry `Origin: {scheme}://`.
    pub scheme: String,
    /// Prefix of the local storage keys.
    pub storage_prefix: String,
    /// Server cookie namespace(s) a response must touch to be persisted.
    pub cookie_prefix: CookiePrefix,
    /// Skip caching `/get-session` response bodies.
    pub disable_cache: bool,
    /// Log cookie names and header contents.
    pub debug: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scheme: String::new(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            cookie_prefix: CookiePrefix::default(),
            disable_cache: false,
            debug: false,
        }
    }
}

impl SessionConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the app URL scheme.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the storage key prefix. An empty prefix keeps the default.
    pub fn storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.storage_prefix = if prefix.is_empty() {
            DEFAULT_STORAGE_PREFIX.to_string()
        } else {
            prefix
        };
        self
    }

    /// Set the server cookie prefix or prefixes.
    pub fn cookie_prefix(mut self, prefix: impl Into<CookiePrefix>) -> Self {
        self.cookie_prefix = prefix.into();
        self
    }

    /// Enable or disable the `/get-session` response cache.
    pub fn disable_cache(mut self, disable: bool) -> Self {
        self.disable_cache = disable;
        self
    }

    /// Enable or disable verbose logging.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Storage key of the cookie snapshot.
    pub fn cookie_key(&self) -> String {
        format!("{}_cookie", self.storage_prefix)
    }

    /// Storage key of the cached session body.
    pub fn session_cache_key(&self) -> String {
        format!("{}_session_data", self.storage_prefix)
    }

    /// Value of the `Origin` request header.
    pub fn origin(&self) -> String {
        format!("{}://", self.scheme)
    }
}
