//! Access-token payload decoding for display.
//!
//! The signature is never checked. Anything unparsable yields the empty
//! identity.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use campus_core::models::DecodedIdentity;

/// Claims checked for a display name, in order.
const NAME_CLAIMS: [&str; 5] = ["unique_name", "preferred_username", "username", "name", "sub"];

/// Decode the display identity carried by an access token.
pub fn decode(access_token: &str) -> DecodedIdentity {
    match payload_claims(access_token) {
        Some(claims) => DecodedIdentity {
            display_name: display_name(&claims).unwrap_or_default(),
            expires_at: expiry(&claims),
        },
        None => DecodedIdentity::default(),
    }
}

/// Decode an optional token; `None` is the empty identity.
pub fn decode_optional(access_token: Option<&str>) -> DecodedIdentity {
    access_token.map(decode).unwrap_or_default()
}

fn payload_claims(token: &str) -> Option<Map<String, Value>> {
    let mut segments = token.trim().split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;

    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

fn display_name(claims: &Map<String, Value>) -> Option<String> {
    NAME_CLAIMS.iter().find_map(|claim| match claims.get(*claim) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

fn expiry(claims: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let secs = match claims.get("exp")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => s.parse::<i64>().ok()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}
