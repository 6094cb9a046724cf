//! Mapping from HTTP status to the client's error taxonomy.

use campus_core::constants::{HTTP_BAD_REQUEST, HTTP_NOT_FOUND, HTTP_UNAUTHORIZED};
use campus_core::errors::ApiError;
use campus_core::models::FailureEnvelope;
use campus_core::traits::TransportResponse;

use crate::http_client::ApiResponse;

/// Accept a 2xx response or turn it into the matching [`ApiError`].
///
/// 401 here is final: by the time a response is classified the refresh
/// protocol (if any) has already run.
pub fn classify(path: &str, response: TransportResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        return Ok(ApiResponse::new(path, response));
    }
    let failure = FailureEnvelope::parse(&response.body);
    Err(match response.status {
        HTTP_BAD_REQUEST => ApiError::Validation(failure.field_errors()),
        HTTP_UNAUTHORIZED => unauthorized(&failure),
        HTTP_NOT_FOUND => ApiError::NotFound {
            path: path.to_string(),
        },
        status => ApiError::ServerFault {
            status,
            message: failure
                .best_message()
                .unwrap_or_else(|| format!("HTTP {status}")),
        },
    })
}

/// [`classify`] for a call made under the refresh protocol: a 401 is
/// `AuthExpired`, which the caller resolves by refreshing.
pub fn classify_authenticated(
    path: &str,
    response: TransportResponse,
) -> Result<ApiResponse, ApiError> {
    if response.status != HTTP_UNAUTHORIZED {
        return classify(path, response);
    }
    Err(ApiError::AuthExpired {
        reason: rejection_reason(&FailureEnvelope::parse(&response.body)),
    })
}

fn unauthorized(failure: &FailureEnvelope) -> ApiError {
    ApiError::AuthInvalid {
        reason: rejection_reason(failure),
    }
}

fn rejection_reason(failure: &FailureEnvelope) -> String {
    failure
        .best_message()
        .unwrap_or_else(|| "unauthorized".to_string())
}
