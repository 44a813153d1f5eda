//! In-memory key-value storage.

use crate::base::cookieerror::CookieError;
use crate::storage::KeyValueStorage;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CookieError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CookieError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
