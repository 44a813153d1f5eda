//! Error context helpers for storage backends.
//!
//! Backend errors are converted into [`CookieError`] and tagged with the
//! storage key the operation touched.

use crate::base::cookieerror::CookieError;

/// Extension trait for attaching the storage key to a backend `Result`.
pub trait StorageResultExt<T> {
    /// Convert the error into a [`CookieError`] naming `key`.
    ///
    /// # Example
    /// ```ignore
    /// use sessionjar::base::context::StorageResultExt;
    ///
    /// conn.execute(SQL, params![key, value]).storage_context(key)?;
    /// // Error: "Storage operation on 'better-auth_cookie' failed: ..."
    /// ```
    fn storage_context(self, key: &str) -> Result<T, CookieError>;
}

impl<T, E> StorageResultExt<T> for Result<T, E>
where
    E: Into<CookieError>,
{
    fn storage_context(self, key: &str) -> Result<T, CookieError> {
        self.map_err(|e| match e.into() {
            CookieError::StorageFailed { message, .. } => CookieError::StorageFailed {
                key: key.to_string(),
                message,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_context_sets_key() {
        let result: Result<(), CookieError> = Err(CookieError::storage_failed("", "io error"));
        let err = result.storage_context("app_cookie").unwrap_err();

        match err {
            CookieError::StorageFailed { key, message } => {
                assert_eq!(key, "app_cookie");
                assert_eq!(message, "io error");
            }
            _ => panic!("Expected StorageFailed"),
        }
    }

    #[test]
    fn test_storage_context_keeps_other_variants() {
        let result: Result<(), CookieError> = Err(CookieError::StorageLocked);
        let err = result.storage_context("app_cookie").unwrap_err();
        assert!(matches!(err, CookieError::StorageLocked));
    }
}
