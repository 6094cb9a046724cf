//! # campus-transport
//!
//! The single outbound pipeline. [`HttpClient`] decorates every request with
//! the bearer and locale headers, classifies responses into
//! [`ApiError`](campus_core::ApiError), and runs the refresh-and-retry
//! protocol on a 401. [`AuthApi`] is the login/register/logout surface built
//! on top of it.

pub mod auth_api;
pub mod classify;
mod grant;
pub mod http_client;
pub mod refresh;
pub mod transport;

pub use auth_api::{AuthApi, LoginRequest, RegisterRequest};
pub use http_client::{ApiResponse, HttpClient, RetryMarker};
pub use refresh::{RefreshCoordinator, RefreshOutcome};
pub use transport::ReqwestTransport;
