//! Login, registration, and logout over the HTTP client.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use campus_core::errors::{ApiError, CampusResult};
use campus_core::models::{CredentialPair, DecodedIdentity, Submission};
use campus_core::traits::{Method, Transport};

use campus_session::SessionController;

use crate::grant::GrantBody;
use crate::http_client::HttpClient;

#[derive(Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

pub struct AuthApi<T: Transport> {
    http: Arc<HttpClient<T>>,
}

impl<T: Transport> AuthApi<T> {
    pub fn new(http: Arc<HttpClient<T>>) -> Self {
        Self { http }
    }

    pub fn session(&self) -> &Arc<SessionController> {
        self.http.session()
    }

    /// Exchange credentials for a token pair and start the session.
    ///
    /// A 400 comes back as `Rejected` field errors for the form. Wrong
    /// credentials are `Err(AuthInvalid)`; no response is
    /// `Err(NetworkUnreachable)`.
    pub async fn login(&self, request: &LoginRequest) -> CampusResult<Submission<DecodedIdentity>> {
        let path = &self.http.config().login_path;
        let body = json!({ "username": request.username, "password": request.password });
        let response = match self.http.send_anonymous(Method::Post, path, Some(body)).await {
            Ok(response) => response,
            Err(ApiError::Validation(fields)) => return Ok(Submission::Rejected(fields)),
            Err(e) => return Err(e.into()),
        };

        let grant = response.json::<GrantBody>()?.into_grant();
        let Some(refresh_token) = grant.refresh_token.filter(|rt| !rt.is_empty()) else {
            return Err(ApiError::MalformedResponse {
                path: path.clone(),
                reason: "login response carried no refresh token".into(),
            }
            .into());
        };
        let identity = self
            .http
            .session()
            .login(CredentialPair::new(grant.access_token, refresh_token))?;
        Ok(Submission::Saved(identity))
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Submission<()>, ApiError> {
        let path = &self.http.config().register_path;
        let body = json!({
            "username": request.username,
            "email": request.email,
            "password": request.password,
            "fullName": request.full_name,
        });
        match self.http.send_anonymous(Method::Post, path, Some(body)).await {
            Ok(_) => {
                info!(username = %request.username, "auth: account registered");
                Ok(Submission::Saved(()))
            }
            Err(ApiError::Validation(fields)) => Ok(Submission::Rejected(fields)),
            Err(e) => Err(e),
        }
    }

    /// Log out locally. No network call.
    pub fn logout_local(&self) {
        self.http.session().logout_local();
    }

    /// Ask the server to invalidate every session, then log out locally
    /// whatever it answered.
    pub async fn logout_everywhere(&self) {
        let path = self.http.config().logout_path.clone();
        let revoke = async {
            self.http
                .request(Method::Post, &path, None)
                .await
                .map(|_| ())
        };
        self.http.session().logout_everywhere(revoke).await;
    }
}
