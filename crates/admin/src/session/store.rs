//! Persisted admin session record.

use std::sync::Arc;

use pharmacy_admin_core::AdminIdentity;

use crate::storage::{StorageBackend, StorageError};

/// Storage key holding the serialized [`AdminIdentity`].
pub const SESSION_KEY: &str = "admin";

/// Reads and writes the admin identity in a [`StorageBackend`].
///
/// `load` never fails: a missing, empty, unreadable or unparsable record all
/// mean "no admin logged in". `clear` is idempotent.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn StorageBackend>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Serialize `identity` under [`SESSION_KEY`], replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn save(&self, identity: &AdminIdentity) -> Result<(), StorageError> {
        let json = serde_json::to_string(identity)?;
        self.backend.set_item(SESSION_KEY, &json)
    }

    /// The stored identity, if there is a usable one.
    #[must_use]
    pub fn load(&self) -> Option<AdminIdentity> {
        let raw = match self.backend.get_item(SESSION_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                tracing::debug!(error = %e, "Session storage unreadable, treating as logged out");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    "Stored session does not parse, treating as logged out"
                );
                None
            }
        }
    }

    /// Remove the stored identity. Backend failures are logged, not returned.
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove_item(SESSION_KEY) {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &SESSION_KEY)
            .finish_non_exhaustive()
    }
}
