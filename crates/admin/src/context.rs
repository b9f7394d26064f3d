//! Application-wide authentication context.
//!
//! [`AuthContext`] is what the UI layer talks to: it bootstraps the session
//! from storage, forwards login/register/logout to the [`AuthService`], and
//! exposes the reactive [`AuthState`], including expiries caused by a 401 on
//! any request anywhere in the client.

use secrecy::SecretString;
use tokio::sync::watch;

use pharmacy_admin_core::AdminIdentity;

use crate::error::AdminError;
use crate::services::{AuthService, RegistrationForm};
use crate::session::AuthState;

#[derive(Debug, Clone)]
pub struct AuthContext {
    auth: AuthService,
}

impl AuthContext {
    #[must_use]
    pub const fn new(auth: AuthService) -> Self {
        Self { auth }
    }

    #[must_use]
    pub const fn service(&self) -> &AuthService {
        &self.auth
    }

    /// Leave `Loading` based on the persisted session.
    pub fn bootstrap(&self) -> AuthState {
        match self.auth.current_identity() {
            Some(identity) => {
                tracing::debug!(email = %identity.email, "Restored admin session");
                self.auth.state().set_authenticated(identity);
            }
            None => self.auth.state().set_unauthenticated(),
        }
        self.state()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.auth.state().current()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.state().is_authenticated()
    }

    /// The signed-in admin, if any.
    #[must_use]
    pub fn identity(&self) -> Option<AdminIdentity> {
        self.state().identity().cloned()
    }

    /// # Errors
    ///
    /// See [`AuthService::login`].
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AdminIdentity, AdminError> {
        self.auth.login(email, password).await
    }

    /// # Errors
    ///
    /// See [`AuthService::register`].
    pub async fn register(&self, form: &RegistrationForm) -> Result<AdminIdentity, AdminError> {
        self.auth.register(form).await
    }

    pub async fn logout(&self) {
        self.auth.logout().await;
    }

    /// Receiver for every later state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth.state().subscribe()
    }

    /// Wait for the next transition and return the new state.
    pub async fn changed(&self) -> AuthState {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so this only errors if it was dropped.
        let _ = rx.changed().await;
        rx.borrow().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::http::{HttpClient, LogNavigator};
    use crate::session::{SessionState, SessionStore};
    use crate::storage::MemoryStorage;
    use pharmacy_admin_core::Email;

    fn context() -> (AuthContext, SessionStore) {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let state = SessionState::new();
        let http = HttpClient::with_session(
            "http://localhost:3000".parse().unwrap(),
            &store,
            &state,
            Arc::new(LogNavigator),
        )
        .unwrap();
        (
            AuthContext::new(AuthService::new(http, store.clone(), state)),
            store,
        )
    }

    #[test]
    fn test_bootstrap_without_session() {
        let (context, _) = context();
        assert_eq!(context.state(), AuthState::Loading);
        assert_eq!(context.bootstrap(), AuthState::Unauthenticated);
        assert!(!context.is_authenticated());
        assert!(context.identity().is_none());
    }

    #[test]
    fn test_bootstrap_restores_session() {
        let (context, store) = context();
        let admin = AdminIdentity::new(
            "Admin",
            Email::parse("admin@x.com").unwrap(),
            Some("abc".to_string()),
        );
        store.save(&admin).unwrap();

        assert_eq!(context.bootstrap(), AuthState::Authenticated(admin.clone()));
        assert!(context.is_authenticated());
        assert_eq!(context.identity(), Some(admin));
    }

    #[tokio::test]
    async fn test_changed_sees_out_of_band_expiry() {
        let (context, store) = context();
        store
            .save(&AdminIdentity::new(
                "Admin",
                Email::parse("admin@x.com").unwrap(),
                None,
            ))
            .unwrap();
        context.bootstrap();

        let waiter = {
            let context = context.clone();
            tokio::spawn(async move { context.changed().await })
        };
        tokio::task::yield_now().await;
        context.service().state().expire();

        assert_eq!(waiter.await.unwrap(), AuthState::Unauthenticated);
        assert!(!context.is_authenticated());
    }
}
