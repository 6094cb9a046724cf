use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::defaults::DEFAULT_LOCALE;

/// Locale preference sent as `Accept-Language`. Survives logout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Wrap a locale tag. Blank input falls back to the default locale.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}
