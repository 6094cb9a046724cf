use std::sync::Arc;

use campus_core::constants::LOCALE_KEY;
use campus_core::errors::StorageError;
use campus_core::models::Locale;
use campus_core::traits::KeyValueStore;

/// The persisted `acceptLanguage` preference. Independent of the session.
#[derive(Clone)]
pub struct LocaleStore {
    backend: Arc<dyn KeyValueStore>,
    fallback: Locale,
}

impl LocaleStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, fallback: Locale) -> Self {
        Self { backend, fallback }
    }

    /// The stored locale, or the fallback when unset or unreadable.
    pub fn get(&self) -> Locale {
        match self.backend.get(LOCALE_KEY) {
            Ok(Some(tag)) if !tag.trim().is_empty() => Locale::new(tag),
            Ok(_) => self.fallback.clone(),
            Err(e) => {
                tracing::warn!("storage: locale unreadable, using {}: {e}", self.fallback);
                self.fallback.clone()
            }
        }
    }

    pub fn set(&self, locale: &Locale) -> Result<(), StorageError> {
        self.backend.set(LOCALE_KEY, locale.as_str())
    }
}
