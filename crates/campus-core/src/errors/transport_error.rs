/// Failures where no HTTP response was received at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {reason}")]
    Connect { reason: String },

    #[error("request timed out after {elapsed_ms} ms")]
    TimedOut { elapsed_ms: u64 },

    #[error("transport setup failed: {reason}")]
    Setup { reason: String },
}
