//! Request and response middleware run by [`HttpClient`](super::HttpClient).
//!
//! Request middleware may rewrite the outgoing [`reqwest::Request`]; response
//! middleware observes the outcome of every call. Both lists run in
//! registration order. Plain closures work as middleware too.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, Request, StatusCode};

use super::navigator::Navigator;
use crate::guard::LOGIN_PATH;
use crate::session::{SessionState, SessionStore};

/// Outcome of one HTTP call, as seen by response middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    /// The server answered with `status`.
    Status {
        method: Method,
        path: String,
        status: StatusCode,
    },
    /// The request was sent but no response came back.
    NoResponse {
        method: Method,
        path: String,
        reason: String,
    },
}

impl ResponseEvent {
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NoResponse { .. } => None,
        }
    }
}

/// Transforms every outgoing request before it is sent.
pub trait RequestMiddleware: Send + Sync {
    fn on_request(&self, request: &mut Request);
}

/// Observes every completed call, successful or not.
pub trait ResponseMiddleware: Send + Sync {
    fn on_response(&self, event: &ResponseEvent);
}

impl<F> RequestMiddleware for F
where
    F: Fn(&mut Request) + Send + Sync,
{
    fn on_request(&self, request: &mut Request) {
        self(request);
    }
}

impl<F> ResponseMiddleware for F
where
    F: Fn(&ResponseEvent) + Send + Sync,
{
    fn on_response(&self, event: &ResponseEvent) {
        self(event);
    }
}

// =============================================================================
// Default chain
// =============================================================================

/// Attaches `Authorization: Bearer <token>` from the stored session.
///
/// The store is read on every request, so each call carries the token as it
/// stood when the call was made. Without a stored token no header is added.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    store: SessionStore,
}

impl BearerAuth {
    #[must_use]
    pub const fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

impl RequestMiddleware for BearerAuth {
    fn on_request(&self, request: &mut Request) {
        let Some(identity) = self.store.load() else {
            return;
        };
        let Some(token) = identity.bearer_token() else {
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Stored token is not a valid header value, sending without it"
                );
            }
        }
    }
}

/// Endpoints whose 401 means "wrong credentials", not "session over".
const CREDENTIAL_PATHS: [&str; 2] = ["/admin/auth/login", "/admin/auth/register"];

/// Ends the session when the backend answers 401.
///
/// The stored record is cleared on every 401. Only the call that moves the
/// shared state to `Unauthenticated` redirects to the login screen, so a burst
/// of concurrent 401s navigates once. A 401 from the login or register
/// endpoint leaves any existing session alone.
#[derive(Clone)]
pub struct SessionExpiry {
    store: SessionStore,
    state: SessionState,
    navigator: Arc<dyn Navigator>,
}

impl SessionExpiry {
    pub fn new(store: SessionStore, state: SessionState, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            state,
            navigator,
        }
    }
}

impl ResponseMiddleware for SessionExpiry {
    fn on_response(&self, event: &ResponseEvent) {
        let ResponseEvent::Status {
            status: StatusCode::UNAUTHORIZED,
            method,
            path,
        } = event
        else {
            return;
        };
        if CREDENTIAL_PATHS.iter().any(|p| path.ends_with(p)) {
            tracing::debug!(path, "Credentials rejected, keeping current session");
            return;
        }

        self.store.clear();
        if self.state.expire() {
            tracing::info!(%method, path, "Session rejected by server, redirecting to login");
            self.navigator.redirect(LOGIN_PATH);
        }
    }
}

/// Logs failures the caller may not report itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorLogging;

impl ResponseMiddleware for ErrorLogging {
    fn on_response(&self, event: &ResponseEvent) {
        match event {
            ResponseEvent::Status {
                method,
                path,
                status,
            } => match *status {
                StatusCode::FORBIDDEN => tracing::warn!(%method, path, "Access forbidden"),
                StatusCode::NOT_FOUND => tracing::warn!(%method, path, "Resource not found"),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    tracing::error!(%method, path, "Server error");
                }
                _ => {}
            },
            ResponseEvent::NoResponse {
                method,
                path,
                reason,
            } => {
                tracing::error!(%method, path, reason, "No response received from server");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::http::navigator::RecordingNavigator;
    use crate::session::AuthState;
    use crate::storage::MemoryStorage;
    use pharmacy_admin_core::{AdminIdentity, Email};

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStorage::new()))
    }

    fn request() -> Request {
        Request::new(
            Method::GET,
            "http://localhost:3000/admin/pharmacies".parse().unwrap(),
        )
    }

    fn status_event(status: StatusCode) -> ResponseEvent {
        ResponseEvent::Status {
            method: Method::GET,
            path: "/admin/pharmacies".to_string(),
            status,
        }
    }

    fn admin(token: Option<&str>) -> AdminIdentity {
        AdminIdentity::new(
            "Admin",
            Email::parse("admin@x.com").unwrap(),
            token.map(str::to_string),
        )
    }

    #[test]
    fn test_bearer_auth_injects_stored_token() {
        let store = store();
        store.save(&admin(Some("abc"))).unwrap();

        let mut req = request();
        BearerAuth::new(store).on_request(&mut req);

        let header = req.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer abc");
        assert!(header.is_sensitive());
    }

    #[test]
    fn test_bearer_auth_without_session_or_token() {
        let store = store();
        let auth = BearerAuth::new(store.clone());

        let mut req = request();
        auth.on_request(&mut req);
        assert!(req.headers().get(AUTHORIZATION).is_none());

        store.save(&admin(None)).unwrap();
        let mut req = request();
        auth.on_request(&mut req);
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_session_expiry_clears_and_redirects_once() {
        let store = store();
        store.save(&admin(Some("abc"))).unwrap();
        let state = SessionState::new();
        state.set_authenticated(admin(Some("abc")));
        let navigator = Arc::new(RecordingNavigator::new());

        let expiry = SessionExpiry::new(store.clone(), state.clone(), navigator.clone());
        expiry.on_response(&status_event(StatusCode::UNAUTHORIZED));
        expiry.on_response(&status_event(StatusCode::UNAUTHORIZED));

        assert!(store.load().is_none());
        assert_eq!(state.current(), AuthState::Unauthenticated);
        assert_eq!(navigator.visits(), vec![LOGIN_PATH]);
    }

    #[test]
    fn test_session_expiry_ignores_other_statuses() {
        let store = store();
        store.save(&admin(Some("abc"))).unwrap();
        let state = SessionState::new();
        state.set_authenticated(admin(Some("abc")));
        let navigator = Arc::new(RecordingNavigator::new());

        let expiry = SessionExpiry::new(store.clone(), state.clone(), navigator.clone());
        for status in [
            StatusCode::OK,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            expiry.on_response(&status_event(status));
        }
        expiry.on_response(&ResponseEvent::NoResponse {
            method: Method::GET,
            path: "/".to_string(),
            reason: "connection refused".to_string(),
        });

        assert!(store.load().is_some());
        assert!(state.is_authenticated());
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_session_expiry_skips_rejected_credentials() {
        let store = store();
        store.save(&admin(Some("abc"))).unwrap();
        let state = SessionState::new();
        state.set_authenticated(admin(Some("abc")));
        let navigator = Arc::new(RecordingNavigator::new());

        let expiry = SessionExpiry::new(store.clone(), state.clone(), navigator.clone());
        for path in ["/admin/auth/login", "/api/admin/auth/register"] {
            expiry.on_response(&ResponseEvent::Status {
                method: Method::POST,
                path: path.to_string(),
                status: StatusCode::UNAUTHORIZED,
            });
        }

        assert!(store.load().is_some());
        assert!(state.is_authenticated());
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_closures_are_middleware() {
        let add_header = |req: &mut Request| {
            req.headers_mut()
                .insert("x-trace", HeaderValue::from_static("1"));
        };
        let mut req = request();
        add_header.on_request(&mut req);
        assert_eq!(req.headers().get("x-trace").unwrap(), "1");
    }

    #[test]
    fn test_response_event_status() {
        assert_eq!(
            status_event(StatusCode::NOT_FOUND).status(),
            Some(StatusCode::NOT_FOUND)
        );
    }
}
