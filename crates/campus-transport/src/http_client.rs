//! HTTP client core: header decoration, response classification, and the
//! one-shot refresh-and-retry protocol.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use campus_core::constants::{
    ACCEPT_LANGUAGE_HEADER, APPLICATION_JSON, AUTHORIZATION_HEADER, BEARER_PREFIX,
    CONTENT_TYPE_HEADER,
};
use campus_core::errors::ApiError;
use campus_core::models::{CredentialPair, Envelope, LogoutReason, TokenGrant};
use campus_core::traits::{Method, OutboundRequest, Transport, TransportResponse};
use campus_core::ClientConfig;
use campus_session::SessionController;
use campus_storage::LocaleStore;

use crate::classify::{classify, classify_authenticated};
use crate::grant::GrantBody;
use crate::refresh::{RefreshCoordinator, RefreshOutcome, RefreshTicket};

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    path: String,
}

impl ApiResponse {
    pub(crate) fn new(path: &str, response: TransportResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
            path: path.to_string(),
        }
    }

    /// Deserialize the body. A body that does not parse is a
    /// [`ApiError::MalformedResponse`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::MalformedResponse {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Deserialize the standard `{ data, pagination? }` envelope.
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<Envelope<T>, ApiError> {
        self.json()
    }
}

/// Per-call flag: set once the refresh protocol has run for this call, so
/// the retried attempt cannot trigger it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryMarker {
    retried: bool,
}

impl RetryMarker {
    pub fn is_set(&self) -> bool {
        self.retried
    }

    pub fn set(&mut self) {
        self.retried = true;
    }
}

pub struct HttpClient<T: Transport> {
    transport: T,
    config: ClientConfig,
    session: Arc<SessionController>,
    locale: LocaleStore,
    refresh: RefreshCoordinator,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(
        transport: T,
        config: ClientConfig,
        session: Arc<SessionController>,
        locale: LocaleStore,
    ) -> Self {
        Self {
            transport,
            config,
            session,
            locale,
            refresh: RefreshCoordinator::new(),
        }
    }

    pub fn session(&self) -> &Arc<SessionController> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn locale(&self) -> &LocaleStore {
        &self.locale
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.request(Method::Post, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.request(Method::Put, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(Method::Delete, path, None).await
    }

    /// Send an authenticated request.
    ///
    /// A 401 runs the refresh protocol once; the caller sees the retried
    /// response and never learns a refresh happened. If the refresh fails
    /// the session is terminated and the caller gets `AuthInvalid`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("api_request", %request_id, %method, path);
        self.authenticated(method, path, body.as_ref())
            .instrument(span)
            .await
    }

    /// Send a request with no bearer header and no refresh protocol (login,
    /// register). A 401 is returned as `AuthInvalid`.
    pub async fn send_anonymous(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("api_request", %request_id, %method, path, anonymous = true);
        async {
            let response = self.dispatch(method, path, body.as_ref(), None).await?;
            classify(path, response)
        }
        .instrument(span)
        .await
    }

    async fn authenticated(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        // Epoch first, then credentials: a refresh finishing in between is
        // then seen as newer than this request.
        let observed_epoch = self.refresh.epoch();
        let mut access_token = self.session.credentials().access_token;
        let mut marker = RetryMarker::default();
        let mut renewed_refresh_token = String::new();

        loop {
            let response = self
                .dispatch(method, path, body, access_token.as_deref())
                .await?;
            match classify_authenticated(path, response) {
                Err(ApiError::AuthExpired { reason }) if marker.is_set() => {
                    warn!("refreshed credentials rejected, ending session");
                    self.session
                        .terminate_if_current(LogoutReason::Rejected, &renewed_refresh_token);
                    return Err(ApiError::AuthInvalid { reason });
                }
                Err(ApiError::AuthExpired { .. }) => {
                    marker.set();
                    debug!("access token rejected, refreshing");
                    let pair = self.renew(observed_epoch).await?;
                    access_token = Some(pair.access_token);
                    renewed_refresh_token = pair.refresh_token;
                }
                classified => return classified,
            }
        }
    }

    /// Obtain a renewed pair, either by leading a refresh or by reusing the
    /// outcome of one that finished after `observed_epoch`.
    async fn renew(&self, observed_epoch: u64) -> Result<CredentialPair, ApiError> {
        let wait = self.config.refresh_timeout();
        let ticket = self
            .refresh
            .acquire(observed_epoch, wait)
            .await
            .map_err(|_| {
                warn!("gave up waiting for token refresh");
                ApiError::NetworkUnreachable {
                    reason: format!(
                        "token refresh did not finish within {} ms",
                        self.config.refresh_timeout_ms
                    ),
                }
            })?;

        let outcome = match ticket {
            RefreshTicket::Shared(outcome) => {
                debug!("reusing completed refresh");
                outcome
            }
            RefreshTicket::Leader(lead) => lead.complete(self.perform_refresh().await),
        };

        match outcome {
            RefreshOutcome::Renewed(pair) => Ok(pair),
            RefreshOutcome::Failed(reason) => Err(ApiError::AuthInvalid { reason }),
            RefreshOutcome::Superseded => Err(ApiError::AuthInvalid {
                reason: "session changed during token refresh".into(),
            }),
        }
    }

    /// Exchange the stored refresh token and settle the session. Runs only
    /// under the refresh guard.
    ///
    /// Both the write of a renewed pair and the termination after a failure
    /// apply only while the exchanged refresh token is still the stored one,
    /// so a logout or login made meanwhile is never undone.
    async fn perform_refresh(&self) -> RefreshOutcome {
        let Some(refresh_token) = self.session.credentials().refresh_token else {
            warn!("token refresh failed: no refresh token stored");
            self.session.terminate(LogoutReason::RefreshFailed);
            return RefreshOutcome::Failed("no refresh token stored".into());
        };

        let stored = match self.exchange(&refresh_token).await {
            Ok(grant) => self
                .session
                .store_refreshed(grant, &refresh_token)
                .map_err(|e| e.to_string()),
            Err(reason) => Err(reason),
        };
        match stored {
            Ok(Some(pair)) => RefreshOutcome::Renewed(pair),
            Ok(None) => RefreshOutcome::Superseded,
            Err(reason) => {
                warn!(%reason, "token refresh failed");
                if self
                    .session
                    .terminate_if_current(LogoutReason::RefreshFailed, &refresh_token)
                {
                    RefreshOutcome::Failed(reason)
                } else {
                    RefreshOutcome::Superseded
                }
            }
        }
    }

    /// One call to the refresh endpoint, bounded by the refresh timeout.
    async fn exchange(&self, refresh_token: &str) -> Result<TokenGrant, String> {
        let request = self.decorate(
            Method::Post,
            &self.config.refresh_path,
            Some(&json!({ "refreshToken": refresh_token })),
            None,
        );
        let sent =
            tokio::time::timeout(self.config.refresh_timeout(), self.transport.send(request)).await;
        let response = match sent {
            Err(_) => {
                return Err(format!(
                    "refresh call timed out after {} ms",
                    self.config.refresh_timeout_ms
                ))
            }
            Ok(Err(e)) => return Err(e.to_string()),
            Ok(Ok(response)) => response,
        };
        if !response.is_success() {
            return Err(format!("refresh endpoint answered HTTP {}", response.status));
        }
        response
            .json::<GrantBody>()
            .map(GrantBody::into_grant)
            .map_err(|e| format!("unreadable refresh response: {e}"))
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        access_token: Option<&str>,
    ) -> Result<TransportResponse, ApiError> {
        let request = self.decorate(method, path, body, access_token);
        debug!(url = %request.url, authorized = access_token.is_some(), "dispatching");
        let response = self.transport.send(request).await.map_err(|e| {
            debug!("no response: {e}");
            ApiError::NetworkUnreachable {
                reason: e.to_string(),
            }
        })?;
        debug!(status = response.status, "response received");
        Ok(response)
    }

    fn decorate(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        access_token: Option<&str>,
    ) -> OutboundRequest {
        let mut request = OutboundRequest::new(method, self.config.url_for(path))
            .with_header(ACCEPT_LANGUAGE_HEADER, self.locale.get().as_str());
        if let Some(token) = access_token {
            request = request.with_header(AUTHORIZATION_HEADER, format!("{BEARER_PREFIX}{token}"));
        }
        if let Some(body) = body {
            request = request
                .with_header(CONTENT_TYPE_HEADER, APPLICATION_JSON)
                .with_body(body.clone());
        }
        request
    }
}
