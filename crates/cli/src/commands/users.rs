//! App user commands.

use pharmacy_admin::AdminClient;
use pharmacy_admin_core::{Email, NewUser, UserId, UserStatus};

use super::{CliError, location_from_args, parse_status};
use crate::LocationArgs;
use crate::output::{self, Output};

/// # Errors
///
/// Returns an error if the status is unknown or the request fails.
pub async fn list(app: &AdminClient, out: &Output, status: Option<&str>) -> Result<(), CliError> {
    let items = match status {
        Some(raw) => {
            app.users
                .list_by_status(parse_status::<UserStatus>(raw)?)
                .await?
        }
        None => app.users.list().await?,
    };
    out.emit(items.as_slice(), output::users)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn show(app: &AdminClient, out: &Output, id: &str) -> Result<(), CliError> {
    let user = app.users.get(&UserId::new(id)).await?;
    out.emit(&user, output::user)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn search(app: &AdminClient, out: &Output, query: &str) -> Result<(), CliError> {
    let items = app.users.search(query).await?;
    out.emit(items.as_slice(), output::users)
}

/// # Errors
///
/// Returns a validation error before any request, or the backend's rejection.
pub async fn create(
    app: &AdminClient,
    out: &Output,
    name: String,
    email: &str,
    location: &LocationArgs,
) -> Result<(), CliError> {
    let user = NewUser {
        name,
        email: Email::parse(email).map_err(pharmacy_admin::ValidationError::from)?,
        location: location_from_args(location)?,
    };
    let created = app.users.create(&user).await?;
    out.emit(&created, output::user)
}

/// Ban or unban a user.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn set_status(
    app: &AdminClient,
    out: &Output,
    id: &str,
    status: UserStatus,
) -> Result<(), CliError> {
    let user = app.users.update_status(&UserId::new(id), status).await?;
    out.emit(&user, output::user)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn delete(app: &AdminClient, id: &str) -> Result<(), CliError> {
    app.users.delete(&UserId::new(id)).await?;
    tracing::info!(id, "User deleted");
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn stats(app: &AdminClient, out: &Output) -> Result<(), CliError> {
    let stats = app.users.statistics().await?;
    out.emit(&stats, output::statistics)
}
