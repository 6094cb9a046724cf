//! Server response envelopes.
//!
//! Success: `{ status?, message?, data, pagination? }`.
//! Failure: `{ status?, message?, error? }`, where `error` may be a
//! per-field validation map or a plain string.

use serde::{Deserialize, Serialize};

use crate::errors::FieldErrors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub total_items: Option<u64>,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureEnvelope {
    pub status: Option<u16>,
    pub message: Option<String>,
    pub error: Option<serde_json::Value>,
}

impl FailureEnvelope {
    /// Parse a failure body. Non-JSON bodies yield an empty envelope.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn field_errors(&self) -> FieldErrors {
        FieldErrors::from_envelope(self.message.as_deref(), self.error.as_ref())
    }

    /// Best human-readable message: a string `error`, else `message`.
    pub fn best_message(&self) -> Option<String> {
        match &self.error {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => self.message.clone().filter(|m| !m.is_empty()),
        }
    }
}

/// Result of a form submission: validation failures come back as data so the
/// form can render them inline.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    Saved(T),
    Rejected(FieldErrors),
}

impl<T> Submission<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn saved(self) -> Option<T> {
        match self {
            Self::Saved(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&FieldErrors> {
        match self {
            Self::Rejected(errors) => Some(errors),
            Self::Saved(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Submission<U> {
        match self {
            Self::Saved(value) => Submission::Saved(f(value)),
            Self::Rejected(errors) => Submission::Rejected(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_tolerates_missing_optional_members() {
        let env: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert_eq!(env.data, vec![1, 2]);
        assert!(env.pagination.is_none());

        let env: Envelope<Vec<u32>> = serde_json::from_str(
            r#"{"status":200,"data":[],"pagination":{"page":2,"itemsPerPage":10,"totalPages":3}}"#,
        )
        .unwrap();
        let pagination = env.pagination.unwrap();
        assert_eq!(pagination.page, Some(2));
        assert_eq!(pagination.total_pages, Some(3));
        assert_eq!(pagination.total_items, None);
    }

    #[test]
    fn failure_envelope_survives_non_json_bodies() {
        let env = FailureEnvelope::parse("<html>Bad Gateway</html>");
        assert!(env.best_message().is_none());
        assert!(env.field_errors().is_empty());
    }
}
