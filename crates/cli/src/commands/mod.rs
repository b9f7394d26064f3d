//! Command implementations.
//!
//! Each submodule handles one top-level subcommand. They all share one
//! [`AdminClient`] built from the environment:
//!
//! - `PHARMACY_API_URL` - Backend origin (default `http://localhost:3000`)
//! - `PHARMACY_ADMIN_SESSION_FILE` - Where the session is kept between runs

pub mod auth;
pub mod dashboard;
pub mod export;
pub mod medicines;
pub mod pharmacies;
pub mod users;

use std::io::BufRead;
use std::sync::Arc;

use pharmacy_admin::config::ConfigError;
use pharmacy_admin::http::Navigator;
use pharmacy_admin::{
    AdminClient, AdminError, ClientConfig, GuardDecision, Screen, ValidationError, guard,
};
use pharmacy_admin_core::Location;
use secrecy::SecretString;
use thiserror::Error;

use crate::LocationArgs;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No stored session; the command needs one.
    #[error("Not signed in. Run `pa-cli auth login` first")]
    LoginRequired,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self::Admin(err.into())
    }
}

/// Navigator for the terminal: there is no screen to switch to, so the
/// operator is told how to sign back in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn redirect(&self, path: &str) {
        tracing::warn!(path, "Session expired. Run `pa-cli auth login` to sign in again");
    }
}

/// Build the client from the environment and restore any stored session.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn connect() -> Result<AdminClient, CliError> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(
        api_url = %config.api_url,
        session_file = %config.session_file.display(),
        "Loaded configuration"
    );

    let app = AdminClient::from_config(&config, Arc::new(CliNavigator))?;
    app.auth.bootstrap();
    Ok(app)
}

/// Run the route guard for `screen` against the restored session.
///
/// # Errors
///
/// Returns `CliError::LoginRequired` unless the screen may be rendered.
pub fn require_session(app: &AdminClient, screen: Screen) -> Result<(), CliError> {
    match guard(&app.auth.state(), screen) {
        GuardDecision::Render => Ok(()),
        GuardDecision::Redirect(path) => {
            tracing::debug!(%screen, to = path, "Guard redirected");
            Err(CliError::LoginRequired)
        }
        GuardDecision::Pending => Err(CliError::LoginRequired),
    }
}

/// Use the given secret or read one line from stdin.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
#[allow(clippy::print_stderr)]
pub fn secret_or_prompt(value: Option<String>, prompt: &str) -> Result<SecretString, CliError> {
    if let Some(value) = value {
        return Ok(SecretString::from(value));
    }

    eprint!("{prompt}: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(
        line.trim_end_matches(['\r', '\n']).to_string(),
    ))
}

/// Turn the location flags into a validated [`Location`].
///
/// An address without coordinates is placed on the default map centre.
///
/// # Errors
///
/// Returns a validation error if a coordinate is out of range.
pub fn location_from_args(args: &LocationArgs) -> Result<Option<Location>, CliError> {
    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            let location = Location::new(lat, lon, args.address.clone())
                .map_err(ValidationError::from)?;
            Ok(Some(location))
        }
        _ => Ok(args.address.as_ref().map(|address| Location {
            address: Some(address.clone()),
            ..Location::default()
        })),
    }
}

/// Parse a status flag with the entity's `FromStr`.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if the value is not a known status.
pub fn parse_status<T>(raw: &str) -> Result<T, CliError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| CliError::InvalidArgument(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pharmacy_admin::http::HttpClient;
    use pharmacy_admin::services::AuthService;
    use pharmacy_admin::storage::MemoryStorage;
    use pharmacy_admin::{AuthContext, SessionState, SessionStore};
    use pharmacy_admin_core::{PharmacyStatus, UserStatus};

    fn offline_client() -> AdminClient {
        let config = ClientConfig {
            api_url: "http://localhost:3000".parse().unwrap(),
            session_file: std::path::PathBuf::from("unused.json"),
        };
        AdminClient::new(&config, Arc::new(MemoryStorage::new()), Arc::new(CliNavigator)).unwrap()
    }

    #[test]
    fn test_require_session_while_loading() {
        let app = offline_client();
        assert!(matches!(
            require_session(&app, Screen::Pharmacies),
            Err(CliError::LoginRequired)
        ));
    }

    #[test]
    fn test_require_session_without_login() {
        let app = offline_client();
        app.auth.bootstrap();
        assert!(matches!(
            require_session(&app, Screen::Dashboard),
            Err(CliError::LoginRequired)
        ));
    }

    #[test]
    fn test_require_session_restored() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store
            .save(&pharmacy_admin_core::AdminIdentity::new(
                "Admin",
                pharmacy_admin_core::Email::parse("admin@x.com").unwrap(),
                Some("t".to_string()),
            ))
            .unwrap();
        let state = SessionState::new();
        let http = HttpClient::with_session(
            "http://localhost:3000".parse().unwrap(),
            &store,
            &state,
            Arc::new(CliNavigator),
        )
        .unwrap();
        let auth = AuthContext::new(AuthService::new(http, store, state));
        auth.bootstrap();

        assert_eq!(guard(&auth.state(), Screen::Users), GuardDecision::Render);
    }

    #[test]
    fn test_location_from_args() {
        let none = location_from_args(&LocationArgs::default()).unwrap();
        assert!(none.is_none());

        let args = LocationArgs {
            lat: Some(33.9),
            lon: Some(35.5),
            address: Some("Hamra".to_string()),
        };
        let location = location_from_args(&args).unwrap().unwrap();
        assert_eq!(location.address.as_deref(), Some("Hamra"));

        let args = LocationArgs {
            lat: Some(120.0),
            lon: Some(35.5),
            address: None,
        };
        assert!(matches!(
            location_from_args(&args),
            Err(CliError::Admin(AdminError::Validation(_)))
        ));
    }

    #[test]
    fn test_address_only_uses_default_centre() {
        let args = LocationArgs {
            address: Some("Achrafieh".to_string()),
            ..LocationArgs::default()
        };
        let location = location_from_args(&args).unwrap().unwrap();
        assert!((location.latitude - Location::DEFAULT_LATITUDE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(
            parse_status::<PharmacyStatus>("inactive").unwrap(),
            PharmacyStatus::Inactive
        );
        assert!(matches!(
            parse_status::<UserStatus>("frozen"),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
