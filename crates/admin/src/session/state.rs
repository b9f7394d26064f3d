//! Reactive authentication state shared across the client.

use pharmacy_admin_core::AdminIdentity;
use tokio::sync::watch;

/// Where the admin session currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Startup, before the persisted session has been read.
    #[default]
    Loading,
    Authenticated(AdminIdentity),
    Unauthenticated,
}

impl AuthState {
    /// True only in [`AuthState::Authenticated`].
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&AdminIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Loading | Self::Unauthenticated => None,
        }
    }
}

/// The single reactive container for [`AuthState`].
///
/// Cloning shares the same channel. Writers are the auth service (login,
/// register, logout, bootstrap) and the session-expiry middleware, which can
/// only ever move the state to `Unauthenticated`.
#[derive(Debug, Clone)]
pub struct SessionState {
    tx: watch::Sender<AuthState>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// A new container in the `Loading` state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::Loading);
        Self { tx }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    /// Receiver that observes every later transition, including out-of-band expiry.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub(crate) fn set_authenticated(&self, identity: AdminIdentity) {
        self.tx.send_replace(AuthState::Authenticated(identity));
    }

    pub(crate) fn set_unauthenticated(&self) {
        self.tx.send_replace(AuthState::Unauthenticated);
    }

    /// Move to `Unauthenticated` after the backend rejected the session.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// concurrent expiries can agree on who redirects.
    pub fn expire(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == AuthState::Unauthenticated {
                false
            } else {
                *state = AuthState::Unauthenticated;
                true
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pharmacy_admin_core::Email;

    fn admin() -> AdminIdentity {
        AdminIdentity::new("Admin", Email::parse("admin@x.com").unwrap(), None)
    }

    #[test]
    fn test_starts_loading() {
        let state = SessionState::new();
        assert_eq!(state.current(), AuthState::Loading);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_is_authenticated_tracks_state() {
        let state = SessionState::new();
        state.set_authenticated(admin());
        assert!(state.is_authenticated());
        assert_eq!(state.current().identity(), Some(&admin()));

        state.set_unauthenticated();
        assert!(!state.is_authenticated());
        assert!(state.current().identity().is_none());
    }

    #[test]
    fn test_expire_transitions_once() {
        let state = SessionState::new();
        state.set_authenticated(admin());

        assert!(state.expire());
        assert!(!state.expire());
        assert_eq!(state.current(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_subscribers_see_expiry() {
        let state = SessionState::new();
        state.set_authenticated(admin());
        let mut rx = state.subscribe();

        let expirer = state.clone();
        tokio::spawn(async move {
            expirer.expire();
        });

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AuthState::Unauthenticated);
    }
}
