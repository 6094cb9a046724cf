//! Test fixtures shared across the workspace: a scripted in-process
//! [`Transport`] and unsigned JWT builders.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};

use campus_core::errors::TransportError;
use campus_core::traits::{Method, OutboundRequest, Transport, TransportResponse};

/// Base URL the fixtures assume unless a test picks its own.
pub const BASE_URL: &str = "http://campus.test/api";

/// Build an unsigned JWT carrying `claims`.
pub fn jwt(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.unsigned")
}

/// JWT whose `unique_name` claim is `username`.
pub fn jwt_for(username: &str) -> String {
    jwt(json!({ "unique_name": username, "exp": 4_102_444_800_i64 }))
}

/// Token-pair envelope as returned by login and refresh.
pub fn token_body(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "status": 200,
        "data": { "accessToken": access_token, "refreshToken": refresh_token }
    })
}

/// Success envelope wrapping `data`.
pub fn data_body(data: Value) -> Value {
    json!({ "status": 200, "data": data })
}

/// Failure envelope with a message and optional `error` member.
pub fn error_body(status: u16, message: &str, error: Option<Value>) -> Value {
    let mut body = json!({ "status": status, "message": message });
    if let Some(error) = error {
        body["error"] = error;
    }
    body
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond {
        status: u16,
        body: String,
        delay: Duration,
    },
    Fail {
        reason: String,
        delay: Duration,
    },
}

#[derive(Debug, Default)]
struct Script {
    routes: HashMap<(Method, String), VecDeque<Scripted>>,
    requests: Vec<OutboundRequest>,
}

/// Transport that answers from per-route queues and records every request.
///
/// Routes are keyed by method and the URL with [`BASE_URL`] (or the
/// configured base) stripped, query string included. An unscripted request
/// fails as a connection error. Clones share the same script.
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    base_url: String,
    script: Arc<Mutex<Script>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new(BASE_URL)
    }
}

impl ScriptedTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// Queue a JSON response for `method path`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.respond_after(method, path, status, body, Duration::ZERO)
    }

    /// Queue a JSON response delivered after `delay`.
    pub fn respond_after(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) -> &Self {
        self.push(
            method,
            path,
            Scripted::Respond {
                status,
                body: body.to_string(),
                delay,
            },
        )
    }

    /// Queue a raw-text response.
    pub fn respond_text(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(
            method,
            path,
            Scripted::Respond {
                status,
                body: body.to_string(),
                delay: Duration::ZERO,
            },
        )
    }

    /// Queue a network failure (no response received).
    pub fn fail(&self, method: Method, path: &str, reason: &str) -> &Self {
        self.fail_after(method, path, reason, Duration::ZERO)
    }

    pub fn fail_after(&self, method: Method, path: &str, reason: &str, delay: Duration) -> &Self {
        self.push(
            method,
            path,
            Scripted::Fail {
                reason: reason.to_string(),
                delay,
            },
        )
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.lock().requests.clone()
    }

    /// Requests sent to `method path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<OutboundRequest> {
        let url = format!("{}{}", self.base_url, path);
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    /// Scripted responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.lock().routes.values().map(VecDeque::len).sum()
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) -> &Self {
        self.lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().expect("script lock poisoned")
    }

    fn next_for(&self, request: &OutboundRequest) -> Option<Scripted> {
        let path = request
            .url
            .strip_prefix(&self.base_url)
            .unwrap_or(&request.url)
            .to_string();
        let mut script = self.lock();
        script.requests.push(request.clone());
        script
            .routes
            .get_mut(&(request.method, path))
            .and_then(VecDeque::pop_front)
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let scripted = self.next_for(&request);
        match scripted {
            Some(Scripted::Respond {
                status,
                body,
                delay,
            }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(TransportResponse::new(status, body))
            }
            Some(Scripted::Fail { reason, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Err(TransportError::Connect { reason })
            }
            None => Err(TransportError::Connect {
                reason: format!("no scripted response for {} {}", request.method, request.url),
            }),
        }
    }
}
