//! Pharmacy-locator admin client library.
//!
//! The session and request pipeline behind the admin dashboard, plus the
//! resource services built on it.
//!
//! # Architecture
//!
//! - [`storage`] - Key-value persistence (memory or a JSON file)
//! - [`session`] - The persisted admin record and the reactive auth state
//! - [`http`] - One shared client with an explicit middleware chain
//! - [`services`] - Auth (the only session writer) and resource services
//! - [`context`] - Application-wide auth context for the UI layer
//! - [`guard`] - Pure route-guard decisions
//!
//! # Session flow
//!
//! Services call the [`http::HttpClient`]; its request middleware attaches the
//! stored bearer token. A 401 from any endpoint clears the store, moves the
//! state to `Unauthenticated` and redirects to `/login` exactly once.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod http;
pub mod services;
pub mod session;
pub mod storage;

pub use app::AdminClient;
pub use config::ClientConfig;
pub use context::AuthContext;
pub use error::{AdminError, ErrorKind, ValidationError};
pub use guard::{GuardDecision, LOGIN_PATH, Screen, guard};
pub use session::{AuthState, SessionState, SessionStore};
