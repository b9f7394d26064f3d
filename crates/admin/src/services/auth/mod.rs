//! Admin authentication service.
//!
//! The only writer of the admin session: login and registration persist the
//! returned identity and publish `Authenticated`; logout clears the record
//! and publishes `Unauthenticated` whatever the backend says.

mod form;

pub use form::{RegistrationForm, ValidRegistration};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use pharmacy_admin_core::AdminIdentity;

use crate::error::AdminError;
use crate::http::{ApiError, HttpClient};
use crate::session::{SessionState, SessionStore};

const REGISTER_PATH: &str = "/admin/auth/register";
const LOGIN_PATH: &str = "/admin/auth/login";
const LOGOUT_PATH: &str = "/admin/auth/logout";

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Admin authentication service.
#[derive(Debug, Clone)]
pub struct AuthService {
    http: HttpClient,
    store: SessionStore,
    state: SessionState,
}

impl AuthService {
    #[must_use]
    pub const fn new(http: HttpClient, store: SessionStore, state: SessionState) -> Self {
        Self { http, store, state }
    }

    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Register a new admin and start a session for it.
    ///
    /// The form is validated first; an invalid form never reaches the network.
    ///
    /// # Errors
    ///
    /// - `AdminError::Validation` if the form is invalid
    /// - `AdminError::Registration` with the backend message (or "Registration
    ///   failed") if the backend rejects it
    /// - `AdminError::Network` if the backend is unreachable
    /// - `AdminError::Storage` if the session cannot be persisted
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &RegistrationForm) -> Result<AdminIdentity, AdminError> {
        let valid = form.validate()?;

        let identity: AdminIdentity = self
            .http
            .post_json(
                REGISTER_PATH,
                &RegisterRequest {
                    name: &valid.name,
                    email: valid.email.as_str(),
                    password: valid.password.expose_secret(),
                },
            )
            .await
            .map_err(|e| rejection(e, AdminError::Registration, REGISTRATION_FAILED))?;

        self.start_session(&identity)?;
        tracing::info!("Admin registered");
        Ok(identity)
    }

    /// Log in and start a session.
    ///
    /// On failure the stored session is left as it was, including a 401 for
    /// bad credentials while another session is active.
    ///
    /// # Errors
    ///
    /// - `AdminError::Authentication` with the backend message (or "Login
    ///   failed") on bad credentials
    /// - `AdminError::Network` if the backend is unreachable
    /// - `AdminError::Storage` if the session cannot be persisted
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AdminIdentity, AdminError> {
        let identity: AdminIdentity = self
            .http
            .post_json(
                LOGIN_PATH,
                &LoginRequest {
                    email: email.trim(),
                    password: password.expose_secret(),
                },
            )
            .await
            .map_err(|e| rejection(e, AdminError::Authentication, LOGIN_FAILED))?;

        self.start_session(&identity)?;
        tracing::info!("Admin logged in");
        Ok(identity)
    }

    /// Tell the backend about the logout, then end the local session.
    ///
    /// The local session always ends. A failed backend call is logged and
    /// otherwise ignored, so this cannot fail.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.http.post_empty(LOGOUT_PATH).await {
            tracing::warn!(error = %e, "Logout request failed, clearing local session anyway");
        }

        self.store.clear();
        self.state.set_unauthenticated();
        tracing::info!("Admin logged out");
    }

    /// The persisted identity, read synchronously from the store.
    #[must_use]
    pub fn current_identity(&self) -> Option<AdminIdentity> {
        self.store.load()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_identity().is_some()
    }

    fn start_session(&self, identity: &AdminIdentity) -> Result<(), AdminError> {
        self.store.save(identity)?;
        self.state.set_authenticated(identity.clone());
        Ok(())
    }
}

/// Map a failed login or registration call.
///
/// Any response from the backend is a rejection carrying its `message`;
/// transport and decoding problems keep their own kinds.
fn rejection(err: ApiError, kind: fn(String) -> AdminError, fallback: &str) -> AdminError {
    match err {
        ApiError::Unauthorized { message } | ApiError::Status { message, .. } => {
            kind(message.unwrap_or_else(|| fallback.to_string()))
        }
        ApiError::Network(reason) => AdminError::Network(reason),
        ApiError::Decode(reason) => AdminError::Decode(reason),
        ApiError::InvalidRequest(reason) => AdminError::InvalidRequest(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use reqwest::StatusCode;

    #[test]
    fn test_rejection_prefers_backend_message() {
        let err = rejection(
            ApiError::Unauthorized {
                message: Some("Invalid credentials".to_string()),
            },
            AdminError::Authentication,
            LOGIN_FAILED,
        );
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_rejection_fallbacks() {
        let err = rejection(
            ApiError::Status {
                status: StatusCode::CONFLICT,
                message: None,
            },
            AdminError::Registration,
            REGISTRATION_FAILED,
        );
        assert_eq!(err.kind(), ErrorKind::Registration);
        assert_eq!(err.to_string(), "Registration failed");

        let err = rejection(
            ApiError::Unauthorized { message: None },
            AdminError::Authentication,
            LOGIN_FAILED,
        );
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn test_rejection_keeps_network_errors() {
        let err = rejection(
            ApiError::Network("connection refused".to_string()),
            AdminError::Authentication,
            LOGIN_FAILED,
        );
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
