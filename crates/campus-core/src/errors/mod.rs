//! Error handling for the campus client.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod api_error;
pub mod config_error;
pub mod field_errors;
pub mod storage_error;
pub mod transport_error;

pub use api_error::ApiError;
pub use config_error::ConfigError;
pub use field_errors::FieldErrors;
pub use storage_error::StorageError;
pub use transport_error::TransportError;

/// Umbrella error for operations that cross subsystem boundaries
/// (e.g. login persists credentials after a network call).
#[derive(Debug, thiserror::Error)]
pub enum CampusError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type CampusResult<T> = Result<T, CampusError>;
