use serde::{Deserialize, Serialize};

use super::{DecodedIdentity, Route};

/// Process-wide session state. There is no transient "logging in" state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(DecodedIdentity),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&DecodedIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unauthenticated => None,
        }
    }
}

/// What subscribed views render from. `loading` is true until the controller
/// has finished reading the token store at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn loading() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            loading: true,
        }
    }

    pub fn ready(state: SessionState) -> Self {
        Self {
            state,
            loading: false,
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// User chose "log out on this device".
    Local,
    /// User chose "log out on all devices".
    Everywhere,
    /// The refresh protocol could not renew the credentials.
    RefreshFailed,
    /// The server rejected freshly refreshed credentials.
    Rejected,
}

/// Notifications broadcast to subscribed views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(DecodedIdentity),
    Refreshed(DecodedIdentity),
    LoggedOut(LogoutReason),
    Redirect(Route),
}
