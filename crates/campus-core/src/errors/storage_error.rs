/// Errors raised by the local key/value backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("store lock poisoned: {resource}")]
    LockPoisoned { resource: String },

    #[error("schema setup failed: {reason}")]
    SchemaFailed { reason: String },
}
