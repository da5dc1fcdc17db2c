//! In-memory session holder implementing the executor's session port.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::TimeDelta;
use mockable::Clock;
use tracing::debug;

use crate::domain::{SessionSnapshot, SessionSource};

use super::handshake::TokenSet;

/// Refresh the access token when less than this much lifetime remains.
pub const REFRESH_MARGIN: TimeDelta = TimeDelta::minutes(5);

enum Slot {
    Unauthenticated,
    Loading,
    Active(TokenSet),
}

/// Holds the current token set and exposes it as a [`SessionSource`].
///
/// The manager does not drive the handshake itself; the owning application
/// calls [`SessionManager::begin_login`], runs
/// [`crate::auth::AuthClient::login`] or `refresh`, and installs the result.
pub struct SessionManager {
    clock: Arc<dyn Clock>,
    slot: Mutex<Slot>,
}

impl SessionManager {
    /// Start signed out.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            slot: Mutex::new(Slot::Unauthenticated),
        }
    }

    /// Mark the session as mid-handshake; consumers see `Loading`.
    pub fn begin_login(&self) {
        *self.lock_slot() = Slot::Loading;
    }

    /// Install a freshly obtained token set.
    pub fn install(&self, tokens: TokenSet) {
        debug!(expires_at = %tokens.expires_at, "session tokens installed");
        *self.lock_slot() = Slot::Active(tokens);
    }

    /// Drop all credentials; consumers see `Unauthenticated`.
    pub fn clear(&self) {
        *self.lock_slot() = Slot::Unauthenticated;
    }

    /// Current token set, if signed in.
    #[must_use]
    pub fn token_set(&self) -> Option<TokenSet> {
        match &*self.lock_slot() {
            Slot::Active(tokens) => Some(tokens.clone()),
            _ => None,
        }
    }

    /// Whether the access token expires within `window` from now.
    ///
    /// Signed-out and loading sessions report `false`; there is nothing to
    /// refresh.
    #[must_use]
    pub fn expires_within(&self, window: TimeDelta) -> bool {
        match &*self.lock_slot() {
            Slot::Active(tokens) => tokens.expires_at - self.clock.utc() < window,
            _ => false,
        }
    }

    /// Whether a proactive refresh is due under [`REFRESH_MARGIN`].
    #[must_use]
    pub fn refresh_due(&self) -> bool {
        self.expires_within(REFRESH_MARGIN)
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionSource for SessionManager {
    fn snapshot(&self) -> SessionSnapshot {
        match &*self.lock_slot() {
            Slot::Unauthenticated => SessionSnapshot::unauthenticated(),
            Slot::Loading => SessionSnapshot::loading(),
            Slot::Active(tokens) => SessionSnapshot::authenticated(tokens.access_token.clone()),
        }
    }
}
