//! Typed view over the `accessToken` / `refreshToken` keys.
//!
//! No caching: every read goes to the backend, so a write is visible to the
//! next reader immediately. No token-shape validation happens here.

use std::sync::{Arc, Mutex};

use campus_core::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use campus_core::errors::StorageError;
use campus_core::models::{CredentialPair, StoredCredentials};
use campus_core::traits::KeyValueStore;

pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
    // Pair-level reads and writes hold this so a reader never sees one
    // half of an old pair next to one half of a new pair.
    pair_lock: Mutex<()>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            pair_lock: Mutex::new(()),
        }
    }

    /// Current credentials, or `None` when neither token is stored.
    pub fn get(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let _guard = self.lock()?;
        let stored = StoredCredentials {
            access_token: non_empty(self.backend.get(ACCESS_TOKEN_KEY)?),
            refresh_token: non_empty(self.backend.get(REFRESH_TOKEN_KEY)?),
        };
        Ok((!stored.is_empty()).then_some(stored))
    }

    /// Overwrite both tokens.
    pub fn set(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.write_pair(pair)
    }

    /// Overwrite both tokens only if the stored refresh token is still
    /// `expected_refresh_token`. Returns whether the write happened.
    pub fn replace_if_current(
        &self,
        expected_refresh_token: &str,
        pair: &CredentialPair,
    ) -> Result<bool, StorageError> {
        let _guard = self.lock()?;
        let current = non_empty(self.backend.get(REFRESH_TOKEN_KEY)?);
        if current.as_deref() != Some(expected_refresh_token) {
            return Ok(false);
        }
        self.write_pair(pair)?;
        Ok(true)
    }

    /// Remove both tokens. Other keys (e.g. the locale) are untouched.
    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.backend.remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
    }

    fn write_pair(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        self.backend.set_many(&[
            (ACCESS_TOKEN_KEY, pair.access_token.as_str()),
            (REFRESH_TOKEN_KEY, pair.refresh_token.as_str()),
        ])
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.pair_lock.lock().map_err(|_| StorageError::LockPoisoned {
            resource: "token store".into(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
