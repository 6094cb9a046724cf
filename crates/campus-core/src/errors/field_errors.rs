use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-field validation messages returned by the server on a 400, plus an
/// optional general message for errors that do not belong to a field.
///
/// The server sends `error` either as a map of field → message, a map of
/// field → list of messages, or a bare string. All three normalize here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub general: Option<String>,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// A failure with only a general message.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            general: Some(message.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Build from the failure envelope's `message` and `error` members.
    pub fn from_envelope(message: Option<&str>, error: Option<&Value>) -> Self {
        let mut out = Self {
            general: message.map(str::to_string),
            fields: BTreeMap::new(),
        };
        match error {
            Some(Value::Object(map)) => {
                for (field, value) in map {
                    let messages = match value {
                        Value::String(s) => vec![s.clone()],
                        Value::Array(items) => items
                            .iter()
                            .map(|item| match item {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect(),
                        Value::Null => continue,
                        other => vec![other.to_string()],
                    };
                    if !messages.is_empty() {
                        out.fields.insert(field.clone(), messages);
                    }
                }
            }
            // A bare string `error` is more specific than `message`.
            Some(Value::String(s)) => out.general = Some(s.clone()),
            _ => {}
        }
        out
    }

    /// Add a message for a field.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Messages for one field (empty slice if none).
    pub fn messages_for(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First message for a field, the way an inline form hint renders it.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.messages_for(field).first().map(String::as_str)
    }

    pub fn has_field_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_none() && self.fields.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(general) = &self.general {
            write!(f, "{general}")?;
            if !self.fields.is_empty() {
                write!(f, "; ")?;
            }
        }
        let names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        if !names.is_empty() {
            write!(f, "invalid fields: {}", names.join(", "))?;
        }
        Ok(())
    }
}
