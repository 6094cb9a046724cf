//! Last-issued-wins ordering for list views.
//!
//! Every fetch takes a [`Ticket`]; a response is applied only if its ticket
//! is still the newest one issued for that view.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct ViewSequencer {
    latest: AtomicU64,
}

impl ViewSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

/// A view's current value, published on a `watch` channel. Stale results
/// are dropped.
pub struct LatestWins<V> {
    sequencer: ViewSequencer,
    current: watch::Sender<Option<V>>,
}

impl<V> Default for LatestWins<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LatestWins<V> {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            sequencer: ViewSequencer::new(),
            current,
        }
    }

    /// Start a fetch.
    pub fn begin(&self) -> Ticket {
        self.sequencer.issue()
    }

    /// Apply a fetch result. Returns `false` (and drops `value`) if a newer
    /// fetch has been started since `ticket` was issued.
    pub fn finish(&self, ticket: Ticket, value: V) -> bool {
        if !self.sequencer.is_latest(ticket) {
            debug!(?ticket, "discarding stale response");
            return false;
        }
        self.current.send_replace(Some(value));
        true
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<V>> {
        self.current.subscribe()
    }
}

impl<V: Clone> LatestWins<V> {
    pub fn current(&self) -> Option<V> {
        self.current.borrow().clone()
    }
}
