//! Wiring of the whole client from configuration.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::context::AuthContext;
use crate::error::AdminError;
use crate::http::{HttpClient, Navigator};
use crate::services::{
    AuthService, DashboardService, ExportService, MedicineService, PharmacyService, UserService,
};
use crate::session::{SessionState, SessionStore};
use crate::storage::{FileStorage, StorageBackend};

/// Every service, sharing one session store, one reactive state and one
/// HTTP client.
#[derive(Debug, Clone)]
pub struct AdminClient {
    pub auth: AuthContext,
    pub pharmacies: PharmacyService,
    pub medicines: MedicineService,
    pub users: UserService,
    pub dashboard: DashboardService,
    pub export: ExportService,
}

impl AdminClient {
    /// Build the client with the session persisted in the configured file.
    ///
    /// The returned client is still `Loading`; call
    /// [`AuthContext::bootstrap`] before guarding screens.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AdminError> {
        let backend = Arc::new(FileStorage::new(&config.session_file));
        Self::new(config, backend, navigator)
    }

    /// Build the client over any storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        backend: Arc<dyn StorageBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AdminError> {
        let store = SessionStore::new(backend);
        let state = SessionState::new();
        let http = HttpClient::with_session(config.api_url.clone(), &store, &state, navigator)
            .map_err(|e| AdminError::from_api(e, "Failed to create HTTP client"))?;

        Ok(Self {
            auth: AuthContext::new(AuthService::new(http.clone(), store, state)),
            pharmacies: PharmacyService::new(http.clone()),
            medicines: MedicineService::new(http.clone()),
            users: UserService::new(http.clone()),
            dashboard: DashboardService::new(&http),
            export: ExportService::new(http),
        })
    }
}
