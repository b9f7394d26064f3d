//! Integration tests for the pharmacy admin client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pharmacy-admin-integration-tests
//! ```
//!
//! No external services are needed: every test starts a [`MockBackend`], an
//! axum router on an ephemeral local port standing in for the admin REST
//! API, and drives a real [`AdminClient`] against it.
//!
//! # Test Categories
//!
//! - `auth_flow` - Login, registration and logout
//! - `session_expiry` - Bearer injection and 401 handling
//! - `resources` - Pharmacies, medicines, users, dashboard and export

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use reqwest::Url;
use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use pharmacy_admin::http::Navigator;
use pharmacy_admin::storage::{MemoryStorage, StorageBackend};
use pharmacy_admin::{AdminClient, ClientConfig, SessionStore};
use pharmacy_admin_core::{AdminIdentity, Email};

/// Token the mock login endpoint hands out.
pub const TOKEN: &str = "abc";

/// One request as seen by the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

/// Every request the mock backend received, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    fn push(&self, request: RecordedRequest) {
        if let Ok(mut entries) = self.0.lock() {
            entries.push(request);
        }
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last request to `path`, if any.
    #[must_use]
    pub fn last(&self, path: &str) -> Option<RecordedRequest> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    log.push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_owned),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    });
    next.run(request).await
}

/// An in-process stand-in for the admin backend.
pub struct MockBackend {
    url: Url,
    log: RequestLog,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Serve `router` on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(router: Router) -> Self {
        let log = RequestLog::default();
        let app = router.layer(middleware::from_fn_with_state(log.clone(), record));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}")
                .parse()
                .expect("Mock backend URL is valid"),
            log,
            server,
        }
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn log(&self) -> &RequestLog {
        &self.log
    }

    /// A client against this backend over `backend` storage.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(
        &self,
        backend: Arc<dyn StorageBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> AdminClient {
        client_for(self.url.clone(), backend, navigator)
    }

    /// A bootstrapped client whose store already holds [`admin`] with `token`.
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be seeded.
    #[must_use]
    pub fn signed_in_client(
        &self,
        token: Option<&str>,
        navigator: Arc<dyn Navigator>,
    ) -> (AdminClient, SessionStore) {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(Arc::clone(&backend));
        store
            .save(&admin(token))
            .expect("Failed to seed session");

        let app = self.client(backend, navigator);
        app.auth.bootstrap();
        (app, store)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Build a client for an arbitrary base URL.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client_for(
    url: Url,
    backend: Arc<dyn StorageBackend>,
    navigator: Arc<dyn Navigator>,
) -> AdminClient {
    let config = ClientConfig {
        api_url: url,
        session_file: PathBuf::from("unused-session.json"),
    };
    AdminClient::new(&config, backend, navigator).expect("Failed to build client")
}

/// A base URL nothing is listening on.
///
/// # Panics
///
/// Panics if no local port can be reserved.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve port");
    let addr = listener.local_addr().expect("Reserved port has no address");
    drop(listener);
    format!("http://{addr}").parse().expect("URL is valid")
}

/// The admin used across tests.
///
/// # Panics
///
/// Never; the email is a literal.
#[must_use]
pub fn admin(token: Option<&str>) -> AdminIdentity {
    AdminIdentity::new(
        "Admin",
        Email::parse("admin@x.com").expect("valid email"),
        token.map(str::to_owned),
    )
}

/// What the login and register endpoints return.
#[must_use]
pub fn admin_json() -> Value {
    json!({"name": "Admin", "email": "admin@x.com", "token": TOKEN})
}

#[must_use]
pub fn pharmacy_json(id: &str, title: &str, status: &str, medicine_count: Option<u64>) -> Value {
    let mut pharmacy = json!({
        "_id": id,
        "title": title,
        "description": "",
        "status": status,
        "location": {"latitude": 33.89, "longitude": 35.5, "address": "Hamra"},
    });
    if let (Some(count), Some(map)) = (medicine_count, pharmacy.as_object_mut()) {
        map.insert("medicineCount".to_string(), json!(count));
    }
    pharmacy
}

#[must_use]
pub fn medicine_json(id: &str, title: &str, status: &str) -> Value {
    json!({"_id": id, "title": title, "description": "", "status": status})
}

#[must_use]
pub fn user_json(id: &str, name: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@x.com", name.to_lowercase()),
        "status": status,
    })
}
