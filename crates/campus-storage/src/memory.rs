//! In-process store over `DashMap`. Contents are lost when the last clone drops.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use campus_core::errors::StorageError;
use campus_core::traits::KeyValueStore;

/// Cloneable handle; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
    // DashMap locks per shard; multi-key writes serialize here.
    write_lock: Arc<Mutex<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::LockPoisoned {
            resource: "memory store".into(),
        })?;
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::LockPoisoned {
            resource: "memory store".into(),
        })?;
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}
