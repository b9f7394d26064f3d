//! Sign-in commands.
//!
//! # Usage
//!
//! ```bash
//! pa-cli auth register -n "Admin" -e admin@example.com
//! pa-cli auth login -e admin@example.com
//! pa-cli auth whoami
//! pa-cli auth logout
//! ```
//!
//! Passwords come from `PA_ADMIN_PASSWORD` (and `PA_ADMIN_PASSWORD_CONFIRM`
//! for registration) or are read from stdin.

use serde::Serialize;

use pharmacy_admin::AdminClient;
use pharmacy_admin::services::RegistrationForm;
use pharmacy_admin_core::AdminIdentity;

use super::{CliError, secret_or_prompt};
use crate::output::Output;

/// What `whoami` prints. Never includes the token.
#[derive(Debug, Serialize)]
struct Signed<'a> {
    name: &'a str,
    email: &'a str,
}

impl<'a> From<&'a AdminIdentity> for Signed<'a> {
    fn from(identity: &'a AdminIdentity) -> Self {
        Self {
            name: &identity.name,
            email: identity.email.as_str(),
        }
    }
}

/// # Errors
///
/// Returns the backend's rejection message on bad credentials.
pub async fn login(
    app: &AdminClient,
    out: &Output,
    email: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let password = secret_or_prompt(password, "Password")?;
    let identity = app.auth.login(email, &password).await?;
    out.note(format!("Signed in as {} <{}>", identity.name, identity.email));
    Ok(())
}

/// # Errors
///
/// Returns a validation error before any request, or the backend's rejection.
pub async fn register(
    app: &AdminClient,
    out: &Output,
    name: String,
    email: String,
    password: Option<String>,
    confirm_password: Option<String>,
) -> Result<(), CliError> {
    let password = secret_or_prompt(password, "Password")?;
    let confirm_password = secret_or_prompt(confirm_password, "Confirm password")?;

    let form = RegistrationForm {
        name,
        email,
        password,
        confirm_password,
    };
    let identity = app.auth.register(&form).await?;
    out.note(format!(
        "Registered and signed in as {} <{}>",
        identity.name, identity.email
    ));
    Ok(())
}

pub async fn logout(app: &AdminClient) {
    app.auth.logout().await;
    tracing::info!("Signed out");
}

/// # Errors
///
/// Returns `CliError::LoginRequired` when no session is stored.
pub fn whoami(app: &AdminClient, out: &Output) -> Result<(), CliError> {
    let identity = app.auth.identity().ok_or(CliError::LoginRequired)?;
    out.emit(&Signed::from(&identity), |signed| {
        let mut table = comfy_table::Table::new();
        table.set_header(vec!["Name", "Email"]);
        table.add_row(vec![signed.name, signed.email]);
        table
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pharmacy_admin_core::Email;

    #[test]
    fn test_whoami_payload_has_no_token() {
        let identity = AdminIdentity::new(
            "Admin",
            Email::parse("admin@x.com").unwrap(),
            Some("secret-token".to_string()),
        );
        let json = serde_json::to_string(&Signed::from(&identity)).unwrap();
        assert_eq!(json, r#"{"name":"Admin","email":"admin@x.com"}"#);
    }
}
