//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PHARMACY_API_URL` - Backend base URL (default: `http://localhost:3000`)
//! - `PHARMACY_ADMIN_SESSION_FILE` - Where the admin session is persisted
//!   (default: `<config dir>/pharmacy-admin/session.json`)
//!
//! A `.env` file in the working directory is loaded first when present.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Base URL used when `PHARMACY_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

const API_URL_VAR: &str = "PHARMACY_API_URL";
const SESSION_FILE_VAR: &str = "PHARMACY_ADMIN_SESSION_FILE";
const SESSION_FILE_NAME: &str = "session.json";
const APP_DIR_NAME: &str = "pharmacy-admin";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Could not determine a config directory; set {0}")]
    NoConfigDir(String),
}

/// Admin client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin every request path is joined onto
    pub api_url: Url,
    /// File holding the persisted admin session
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from the environment (and `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns an error if `PHARMACY_API_URL` is not an `http`/`https` URL or
    /// no session file location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default(API_URL_VAR, DEFAULT_API_URL))?;
        let session_file = match get_optional_env(SESSION_FILE_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        Ok(Self {
            api_url,
            session_file,
        })
    }

    /// Configuration pointing at a specific backend, with the default session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_api_url(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            session_file: default_session_file()?,
        })
    }
}

/// Parse and validate a backend base URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` unless the URL parses with an
/// `http` or `https` scheme and has a host.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(API_URL_VAR.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            API_URL_VAR.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            API_URL_VAR.to_string(),
            "missing host".to_string(),
        ));
    }
    Ok(url)
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(SESSION_FILE_NAME))
        .ok_or_else(|| ConfigError::NoConfigDir(SESSION_FILE_VAR.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
