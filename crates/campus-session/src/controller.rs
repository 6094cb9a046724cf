//! SessionController: in-memory session state plus the only writer of the
//! token store.
//!
//! State is published on a `watch` channel (latest snapshot) and transitions
//! on a `broadcast` channel (events, including navigation requests).

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use campus_core::errors::{ApiError, StorageError};
use campus_core::models::{
    CredentialPair, DecodedIdentity, LogoutReason, Route, SessionEvent, SessionSnapshot,
    SessionState, StoredCredentials, TokenGrant,
};
use campus_storage::TokenStore;

use crate::decoder;

const EVENT_CAPACITY: usize = 64;

pub struct SessionController {
    tokens: TokenStore,
    // Held across every store write plus the state publish that goes with it.
    transitions: Mutex<()>,
    state: watch::Sender<SessionSnapshot>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    /// Create a controller in the loading state. Call [`initialize`](Self::initialize)
    /// before rendering anything that needs authentication.
    pub fn new(tokens: TokenStore) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::loading());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tokens,
            transitions: Mutex::new(()),
            state,
            events,
        }
    }

    /// Derive the session from whatever the token store holds.
    ///
    /// A stored access token means Authenticated (its identity decoded
    /// here, before `loading` clears); anything else means Unauthenticated.
    /// No network call is made.
    pub fn initialize(&self) -> SessionSnapshot {
        let state = match self.credentials().access_token {
            Some(access_token) => SessionState::Authenticated(decoder::decode(&access_token)),
            None => SessionState::Unauthenticated,
        };
        info!(
            authenticated = state.is_authenticated(),
            "session: initialized from token store"
        );
        let snapshot = SessionSnapshot::ready(state);
        self.state.send_replace(snapshot.clone());
        snapshot
    }

    /// Persist a freshly issued pair and enter Authenticated.
    pub fn login(&self, pair: CredentialPair) -> Result<DecodedIdentity, StorageError> {
        let _transition = self.transition();
        self.tokens.set(&pair)?;
        let identity = decoder::decode(&pair.access_token);
        self.publish(SessionState::Authenticated(identity.clone()));
        info!(user = %identity.display_name, "session: logged in");
        self.emit(SessionEvent::LoggedIn(identity.clone()));
        self.emit(SessionEvent::Redirect(Route::LANDING));
        Ok(identity)
    }

    /// Clear credentials and return to the login surface. Never fails and
    /// never touches the network.
    pub fn logout_local(&self) {
        self.end(LogoutReason::Local);
    }

    /// Invalidate sessions server-side on a best-effort basis, then log out
    /// locally no matter how the remote call went.
    pub async fn logout_everywhere<F>(&self, revoke: F)
    where
        F: Future<Output = Result<(), ApiError>>,
    {
        match revoke.await {
            Ok(()) => debug!("session: remote logout accepted"),
            // Already logged out as far as the server is concerned.
            Err(ApiError::AuthInvalid { .. }) => {
                debug!("session: remote logout rejected credentials, treating as logged out")
            }
            Err(e) => warn!("session: remote logout failed, logging out locally: {e}"),
        }
        self.end(LogoutReason::Everywhere);
    }

    /// Persist a refreshed grant. The session stays Authenticated with a
    /// recomputed identity.
    ///
    /// Returns `None` without writing anything when the stored refresh token
    /// is no longer `exchanged_refresh_token`, i.e. a logout or login landed
    /// while the refresh call was in flight.
    pub fn store_refreshed(
        &self,
        grant: TokenGrant,
        exchanged_refresh_token: &str,
    ) -> Result<Option<CredentialPair>, StorageError> {
        let _transition = self.transition();
        let pair = grant.into_pair(exchanged_refresh_token);
        if !self.tokens.replace_if_current(exchanged_refresh_token, &pair)? {
            info!("session: discarding refreshed credentials for a superseded session");
            return Ok(None);
        }
        let identity = decoder::decode(&pair.access_token);
        self.publish(SessionState::Authenticated(identity.clone()));
        debug!("session: credentials refreshed");
        self.emit(SessionEvent::Refreshed(identity));
        Ok(Some(pair))
    }

    /// Terminal failure of the refresh protocol: clear everything and
    /// redirect to login.
    pub fn terminate(&self, reason: LogoutReason) {
        warn!(?reason, "session: terminated");
        self.end(reason);
    }

    /// [`terminate`](Self::terminate), but only while the stored refresh
    /// token is still the one a failed refresh tried to exchange. Returns
    /// whether the session was ended.
    pub fn terminate_if_current(
        &self,
        reason: LogoutReason,
        exchanged_refresh_token: &str,
    ) -> bool {
        let _transition = self.transition();
        if self.credentials().refresh_token.as_deref() != Some(exchanged_refresh_token) {
            debug!(?reason, "session: refresh failure belongs to a superseded session");
            return false;
        }
        warn!(?reason, "session: terminated");
        self.end_locked(reason);
        true
    }

    /// Read-through view of the token store. A failed read counts as no
    /// credentials.
    pub fn credentials(&self) -> StoredCredentials {
        match self.tokens.get() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!("session: token store unreadable: {e}");
                StoredCredentials::default()
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().state.is_authenticated()
    }

    pub fn identity(&self) -> Option<DecodedIdentity> {
        self.state.borrow().state.identity().cloned()
    }

    /// Latest-value subscription for render gating.
    pub fn watch_state(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Transition and navigation events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn end(&self, reason: LogoutReason) {
        let _transition = self.transition();
        self.end_locked(reason);
    }

    fn end_locked(&self, reason: LogoutReason) {
        if let Err(e) = self.tokens.clear() {
            warn!("session: failed to clear token store: {e}");
        }
        let was_signed_out = {
            let current = self.state.borrow();
            !current.loading && !current.state.is_authenticated()
        };
        self.publish(SessionState::Unauthenticated);
        if was_signed_out {
            debug!(?reason, "session: already logged out");
            return;
        }
        info!(?reason, "session: logged out");
        self.emit(SessionEvent::LoggedOut(reason));
        self.emit(SessionEvent::Redirect(Route::Login));
    }

    fn publish(&self, state: SessionState) {
        let next = SessionSnapshot::ready(state);
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    fn transition(&self) -> MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock has nothing to repair.
        self.transitions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
