//! Unified error handling for the admin client.
//!
//! Every service returns [`AdminError`]. Callers branch on
//! [`AdminError::kind`] rather than on message text; the `Display` output is
//! the human-readable message meant for the operator.

use pharmacy_admin_core::{EmailError, LocationError, PasswordError, WorkingHoursError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::http::ApiError;
use crate::storage::StorageError;

/// Input rejected on the client, before any request was made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("{0}")]
    Email(#[from] EmailError),

    #[error("{0}")]
    Password(#[from] PasswordError),

    #[error("{0}")]
    WorkingHours(#[from] WorkingHoursError),

    #[error("{0}")]
    Location(#[from] LocationError),

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Nothing to update")]
    EmptyUpdate,
}

/// Application-level error type for the admin client.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Form input was invalid; nothing was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Login was rejected (bad credentials).
    #[error("{0}")]
    Authentication(String),

    /// Registration was rejected (e.g. duplicate email).
    #[error("{0}")]
    Registration(String),

    /// A call mid-session came back 401; the session has been ended.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The server could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected a resource operation.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The session record could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A successful response had an unexpected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Local file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid export type: {0}")]
    InvalidExportType(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Tag identifying an [`AdminError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Registration,
    SessionExpired,
    Network,
    Api,
    Storage,
    Decode,
    Io,
    InvalidExportType,
    Config,
    InvalidRequest,
}

impl AdminError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Registration(_) => ErrorKind::Registration,
            Self::SessionExpired => ErrorKind::SessionExpired,
            Self::Network(_) => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidExportType(_) => ErrorKind::InvalidExportType,
            Self::Config(_) => ErrorKind::Config,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// Map a failed resource call, using `fallback` when the backend sent no message.
    ///
    /// A 401 always becomes [`AdminError::SessionExpired`]: by the time the
    /// caller sees it, middleware has already ended the session.
    #[must_use]
    pub fn from_api(err: ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Unauthorized { .. } => Self::SessionExpired,
            ApiError::Status { status, message } => Self::Api {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| fallback.to_string()),
            },
            ApiError::Network(reason) => Self::Network(reason),
            ApiError::Decode(reason) => Self::Decode(reason),
            ApiError::InvalidRequest(reason) => Self::InvalidRequest(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_admin_error_display() {
        let err = AdminError::Authentication("Invalid credentials".to_string());
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = AdminError::InvalidExportType("csv".to_string());
        assert_eq!(err.to_string(), "Invalid export type: csv");

        let err = AdminError::from(ValidationError::Password(PasswordError::Mismatch));
        assert_eq!(err.to_string(), "Passwords do not match");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_from_api_uses_backend_message_or_fallback() {
        let err = AdminError::from_api(
            ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                message: Some("Title is required".to_string()),
            },
            "Failed to create pharmacy",
        );
        assert_eq!(err.to_string(), "Title is required");
        assert_eq!(err.kind(), ErrorKind::Api);

        let err = AdminError::from_api(
            ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            },
            "Failed to create pharmacy",
        );
        assert!(matches!(
            err,
            AdminError::Api { status: 500, ref message } if message == "Failed to create pharmacy"
        ));
    }

    #[test]
    fn test_from_api_unauthorized_is_session_expired() {
        let err = AdminError::from_api(
            ApiError::Unauthorized {
                message: Some("jwt expired".to_string()),
            },
            "Failed to fetch users",
        );
        assert_eq!(err.kind(), ErrorKind::SessionExpired);
    }

    #[test]
    fn test_from_api_network() {
        let err = AdminError::from_api(
            ApiError::Network("connection refused".to_string()),
            "Failed to fetch users",
        );
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
