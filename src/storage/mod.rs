//! Key-value storage for persisted snapshots.
//!
//! The session client only needs two operations from its backend, read and
//! write of a string value. Some platform stores reject `:` in keys, so
//! every key passes through [`normalize_key`] on its way to the backend
//! (see [`NormalizedStorage`]).
//!
//! | Backend | Module | Notes |
//! |---------|--------|-------|
//! | [`MemoryStorage`](memory::MemoryStorage) | [`memory`] | Process-local, clonable handle |
//! | [`SqliteStorage`](sqlite::SqliteStorage) | [`sqlite`] | Single-table file store (feature `sqlite`) |

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::base::cookieerror::CookieError;
use std::sync::Arc;

pub use memory::MemoryStorage;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

/// Minimal string key-value store.
///
/// Implementations own their consistency: the session client performs a
/// read-modify-write per response and does not lock around it.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, CookieError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), CookieError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, CookieError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CookieError> {
        (**self).set_item(key, value)
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, CookieError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CookieError> {
        (**self).set_item(key, value)
    }
}

/// Make a key safe for stores that reject `:` by replacing it with `_`.
pub fn normalize_key(key: &str) -> String {
    key.replace(':', "_")
}

/// Backend wrapper that normalizes every key before delegating.
#[derive(Debug, Clone, Default)]
pub struct NormalizedStorage<S> {
    inner: S,
}

impl<S: KeyValueStorage> NormalizedStorage<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: KeyValueStorage> KeyValueStorage for NormalizedStorage<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, CookieError> {
        self.inner.get_item(&normalize_key(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CookieError> {
        self.inner.set_item(&normalize_key(key), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(
            normalize_key("better-auth:session_token"),
            "better-auth_session_token"
        );
        assert_eq!(normalize_key("a:b:c"), "a_b_c");
        assert_eq!(normalize_key("plain_key"), "plain_key");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_normalize_key_idempotent() {
        for key in ["a:b", "::", "x_y", "mixed:key_name:"] {
            let once = normalize_key(key);
            assert_eq!(normalize_key(&once), once);
        }
    }

    #[test]
    fn test_normalized_storage_writes_safe_keys() {
        let backend = MemoryStorage::new();
        let storage = NormalizedStorage::new(backend.clone());

        storage
            .set_item("better-auth:session_token", "value123")
            .unwrap();

        assert!(backend.contains_key("better-auth_session_token"));
        assert!(!backend.contains_key("better-auth:session_token"));
        assert_eq!(
            storage.get_item("better-auth:session_token").unwrap(),
            Some("value123".to_string())
        );
    }

    #[test]
    fn test_normalized_storage_reads_existing_keys() {
        let backend = MemoryStorage::new();
        backend
            .set_item("better-auth_session_token", "value123")
            .unwrap();

        let storage = NormalizedStorage::new(backend);
        assert_eq!(
            storage.get_item("better-auth:session_token").unwrap(),
            Some("value123".to_string())
        );
    }
}
