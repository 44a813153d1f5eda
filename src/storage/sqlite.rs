//! SQLite-backed key-value storage.
//!
//! Values live in a single table:
//!
//! ```sql
//! CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)
//! ```

use crate::base::context::StorageResultExt;
use crate::base::cookieerror::CookieError;
use crate::storage::KeyValueStorage;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

/// How long a write waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_millis(500);

/// File-backed store. The connection is guarded by a mutex.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CookieError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, CookieError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, CookieError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("sqlite cookie storage ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self, key: &str) -> Result<MutexGuard<'_, Connection>, CookieError> {
        self.conn
            .lock()
            .map_err(|_| CookieError::storage_failed(key, "connection mutex poisoned"))
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CookieError> {
        let conn = self.lock(key)?;
        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()
        .storage_context(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CookieError> {
        let conn = self.lock(key)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .storage_context(key)?;
        Ok(())
    }
}
