//! HTTP client for the admin REST backend.
//!
//! # Architecture
//!
//! - One shared [`HttpClient`] per process, configured with the backend base
//!   URL and a default `Content-Type: application/json` header
//! - Cross-cutting behaviour lives in an explicit middleware chain: request
//!   middleware rewrites the outgoing request, response middleware observes
//!   the outcome
//! - The default chain attaches the bearer token, ends the session on 401 and
//!   logs 403/404/500/no-response failures
//! - No retries and no client-side timeouts: a failed call fails once

mod client;
pub mod middleware;
pub mod navigator;

pub use client::{HttpClient, HttpClientBuilder};
pub use middleware::{
    BearerAuth, ErrorLogging, RequestMiddleware, ResponseEvent, ResponseMiddleware, SessionExpiry,
};
pub use navigator::{LogNavigator, Navigator, RecordingNavigator};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`HttpClient`] calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401. The session has already been ended by middleware.
    #[error("{}", message.as_deref().unwrap_or("Unauthorized"))]
    Unauthorized { message: Option<String> },

    /// The backend answered with a non-2xx status other than 401.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request failed"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// No response was received (connection refused, DNS failure, reset).
    #[error("No response received from server: {0}")]
    Network(String),

    /// A 2xx body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The request could not be built (bad path, body or multipart part).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// The backend's `message` field, when the error carried one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Status { message, .. } => message.as_deref(),
            Self::Network(_) | Self::Decode(_) | Self::InvalidRequest(_) => None,
        }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) | Self::InvalidRequest(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Unauthorized {
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 404 Not Found: request failed");
    }

    #[test]
    fn test_backend_message_and_status() {
        let err = ApiError::Status {
            status: StatusCode::CONFLICT,
            message: Some("Email already registered".to_string()),
        };
        assert_eq!(err.backend_message(), Some("Email already registered"));
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));

        let err = ApiError::Network("connection refused".to_string());
        assert!(err.backend_message().is_none());
        assert!(err.status().is_none());
    }
}
