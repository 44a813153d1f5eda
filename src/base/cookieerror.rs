use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the typed snapshot and storage APIs.
///
/// The text-level cookie operations never return these; they fall back to
/// an empty snapshot (or "changed") and log the error instead.
#[derive(Debug, Error, Clone)]
pub enum CookieError {
    #[error("Invalid cookie snapshot: {source}")]
    InvalidSnapshot {
        #[source]
        source: Arc<serde_json::Error>,
    },
    #[error("Cookie snapshot encoding failed: {source}")]
    SnapshotEncode {
        #[source]
        source: Arc<serde_json::Error>,
    },
    #[error("Storage operation on '{key}' failed: {message}")]
    StorageFailed { key: String, message: String },
    #[error("Storage is locked")]
    StorageLocked,
    #[error("Invalid value for header '{name}'")]
    InvalidHeaderValue { name: String },
}

impl CookieError {
    pub fn invalid_snapshot(err: serde_json::Error) -> Self {
        CookieError::InvalidSnapshot {
            source: Arc::new(err),
        }
    }

    pub fn snapshot_encode(err: serde_json::Error) -> Self {
        CookieError::SnapshotEncode {
            source: Arc::new(err),
        }
    }

    pub fn storage_failed(key: impl Into<String>, message: impl Into<String>) -> Self {
        CookieError::StorageFailed {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn invalid_header_value(name: impl Into<String>) -> Self {
        CookieError::InvalidHeaderValue { name: name.into() }
    }

    /// Whether retrying the same storage call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, CookieError::StorageLocked)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for CookieError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ffi::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ffi::ErrorCode::DatabaseLocked =>
            {
                CookieError::StorageLocked
            }
            _ => CookieError::StorageFailed {
                key: String::new(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_snapshot_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = CookieError::invalid_snapshot(json_err);
        assert!(err.to_string().starts_with("Invalid cookie snapshot"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_storage_failed_display() {
        let err = CookieError::storage_failed("better-auth_cookie", "disk full");
        assert_eq!(
            err.to_string(),
            "Storage operation on 'better-auth_cookie' failed: disk full"
        );
        assert!(!err.is_transient());
        assert!(CookieError::StorageLocked.is_transient());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_from_rusqlite_busy() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(matches!(CookieError::from(busy), CookieError::StorageLocked));

        let other = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(
            CookieError::from(other),
            CookieError::StorageFailed { .. }
        ));
    }
}
