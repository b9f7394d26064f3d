//! Dashboard statistics.

use pharmacy_admin::AdminClient;

use super::CliError;
use crate::output::{self, Output};

/// # Errors
///
/// Returns the first failure among the three list fetches.
pub async fn show(app: &AdminClient, out: &Output) -> Result<(), CliError> {
    let data = app.dashboard.load().await?;
    out.emit(&data, output::dashboard)
}
