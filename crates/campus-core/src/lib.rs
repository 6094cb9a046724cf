//! # campus-core
//!
//! Foundation crate for the campus admin client.
//! Defines the credential and session models, the storage and transport
//! seams, the error taxonomy, config, and wire constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ClientConfig;
pub use errors::{ApiError, CampusError, CampusResult, FieldErrors, StorageError};
pub use models::{
    CredentialPair, DecodedIdentity, Locale, Route, SessionEvent, SessionSnapshot, SessionState,
    StoredCredentials, Submission, TokenGrant,
};
pub use traits::{KeyValueStore, Method, OutboundRequest, Transport, TransportResponse};
