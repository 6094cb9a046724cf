use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display identity decoded from an access token. Derived, never persisted,
/// never authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedIdentity {
    pub display_name: String,
    /// The token's `exp` claim, for "session expires at" display only.
    pub expires_at: Option<DateTime<Utc>>,
}

impl DecodedIdentity {
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            expires_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_empty()
    }
}
