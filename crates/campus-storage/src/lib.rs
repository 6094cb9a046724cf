//! # campus-storage
//!
//! Persistent local state behind [`KeyValueStore`](campus_core::KeyValueStore):
//! an in-process [`MemoryStore`] and a SQLite-backed [`SqliteStore`].
//! [`TokenStore`] and [`LocaleStore`] are the typed views the rest of the
//! client uses; nothing else reads the raw keys.

pub mod locale_store;
pub mod memory;
pub mod sqlite;
pub mod token_store;

use campus_core::errors::StorageError;

pub use locale_store::LocaleStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use token_store::TokenStore;

/// Convert an error message into a StorageError::SqliteError.
pub(crate) fn to_storage_err(message: String) -> StorageError {
    StorageError::SqliteError { message }
}
