//! Single-flight guard for token refresh.
//!
//! At most one refresh runs per session. A request records the refresh
//! epoch before it is dispatched; if it later finds that a refresh finished
//! in a newer epoch, it reuses that outcome instead of refreshing again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::error::Elapsed;

use campus_core::models::CredentialPair;

/// Result of one refresh attempt, shared with every request that waited on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Renewed(CredentialPair),
    Failed(String),
    /// The session was logged out or replaced while the refresh ran; its
    /// result was discarded.
    Superseded,
}

#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    last: Mutex<Option<RefreshOutcome>>,
    epoch: AtomicU64,
}

/// What a request gets when it needs a refresh.
pub enum RefreshTicket<'a> {
    /// A refresh completed after this request was issued; use its outcome.
    Shared(RefreshOutcome),
    /// This request performs the refresh while holding the guard.
    Leader(RefreshLead<'a>),
}

/// Exclusive right to refresh. Dropping it without [`complete`](Self::complete)
/// releases the guard and leaves the epoch unchanged.
pub struct RefreshLead<'a> {
    guard: MutexGuard<'a, Option<RefreshOutcome>>,
    epoch: &'a AtomicU64,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current refresh epoch. Read this before dispatching a request.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Wait (at most `wait`) for the guard.
    pub async fn acquire(
        &self,
        observed_epoch: u64,
        wait: Duration,
    ) -> Result<RefreshTicket<'_>, Elapsed> {
        let guard = tokio::time::timeout(wait, self.last.lock()).await?;
        if self.epoch.load(Ordering::Acquire) > observed_epoch {
            if let Some(outcome) = guard.as_ref() {
                return Ok(RefreshTicket::Shared(outcome.clone()));
            }
        }
        Ok(RefreshTicket::Leader(RefreshLead {
            guard,
            epoch: &self.epoch,
        }))
    }
}

impl RefreshLead<'_> {
    /// Publish the outcome to later waiters and release the guard.
    pub fn complete(mut self, outcome: RefreshOutcome) -> RefreshOutcome {
        *self.guard = Some(outcome.clone());
        self.epoch.fetch_add(1, Ordering::AcqRel);
        outcome
    }
}
