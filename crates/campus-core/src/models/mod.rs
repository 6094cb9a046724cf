//! Data model shared across the workspace.

pub mod credentials;
pub mod envelope;
pub mod identity;
pub mod locale;
pub mod route;
pub mod session;

pub use credentials::{CredentialPair, StoredCredentials, TokenGrant};
pub use envelope::{Envelope, FailureEnvelope, Pagination, Submission};
pub use identity::DecodedIdentity;
pub use locale::Locale;
pub use route::Route;
pub use session::{LogoutReason, SessionEvent, SessionSnapshot, SessionState};
