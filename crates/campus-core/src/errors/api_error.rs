use super::FieldErrors;

/// Outcome taxonomy for a remote call, as seen by page collaborators.
///
/// `AuthExpired` is raised and consumed inside the HTTP client's refresh
/// protocol; callers only ever see it turned into `AuthInvalid` once the
/// session has been terminated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("access token expired: {reason}")]
    AuthExpired { reason: String },

    #[error("authentication rejected: {reason}")]
    AuthInvalid { reason: String },

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("server unreachable: {reason}")]
    NetworkUnreachable { reason: String },

    #[error("server fault (HTTP {status}): {message}")]
    ServerFault { status: u16, message: String },

    #[error("malformed response from {path}: {reason}")]
    MalformedResponse { path: String, reason: String },
}

impl ApiError {
    /// Whether the error belongs in a transient notice.
    ///
    /// Validation goes back to the form and NotFound is an empty result. An
    /// auth failure ends in a redirect to login. None of those get a notice.
    pub fn is_notice_worthy(&self) -> bool {
        matches!(
            self,
            Self::NetworkUnreachable { .. } | Self::ServerFault { .. } | Self::MalformedResponse { .. }
        )
    }
}
