//! SQLite-backed local state. One connection behind a mutex; every
//! multi-key write runs in a single transaction.

pub mod pragmas;
pub mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use campus_core::errors::StorageError;
use campus_core::traits::KeyValueStore;

use crate::to_storage_err;
use pragmas::apply_pragmas;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the local state database at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        Self::init(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        apply_pragmas(&conn)?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned {
            resource: "sqlite connection".into(),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM local_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| to_storage_err(e.to_string()))?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO local_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![key, value],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        }
        tx.commit().map_err(|e| to_storage_err(e.to_string()))
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| to_storage_err(e.to_string()))?;
        for key in keys {
            tx.execute("DELETE FROM local_state WHERE key = ?1", params![key])
                .map_err(|e| to_storage_err(e.to_string()))?;
        }
        tx.commit().map_err(|e| to_storage_err(e.to_string()))
    }
}
