//! Transient notices that expire on their own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use campus_core::errors::ApiError;

pub const NO_RESPONSE_MESSAGE: &str = "No response received from the server. Please try again.";
pub const MALFORMED_RESPONSE_MESSAGE: &str = "The server sent a response that could not be read.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Instant,
}

impl Notice {
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// Notices live for `ttl` after posting, then disappear from [`active`](Self::active).
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    next_id: AtomicU64,
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: AtomicU64::new(1),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn post(&self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Instant::now();
        let mut notices = self.lock();
        notices.retain(|n| n.expires_at > now);
        notices.push(Notice {
            id,
            kind,
            message: message.into(),
            expires_at: now + self.ttl,
        });
        id
    }

    /// Post a notice for errors that warrant one. Validation, not-found,
    /// and auth failures are handled by the form, the empty list, and the
    /// login redirect respectively.
    pub fn notify_error(&self, error: &ApiError) -> Option<u64> {
        if !error.is_notice_worthy() {
            return None;
        }
        let message = match error {
            ApiError::NetworkUnreachable { .. } => NO_RESPONSE_MESSAGE.to_string(),
            ApiError::MalformedResponse { .. } => MALFORMED_RESPONSE_MESSAGE.to_string(),
            ApiError::ServerFault { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Some(self.post(NoticeKind::Error, message))
    }

    /// Notices held right now, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unexpired notices, oldest first. Expired ones are pruned.
    pub fn active(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut notices = self.lock();
        notices.retain(|n| n.expires_at > now);
        notices.clone()
    }

    pub fn dismiss(&self, id: u64) -> bool {
        let mut notices = self.lock();
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        // A panic mid-push leaves the list usable.
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
