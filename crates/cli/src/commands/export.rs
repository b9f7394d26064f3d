//! Spreadsheet exports.
//!
//! # Usage
//!
//! ```bash
//! pa-cli export pharmacies
//! pa-cli export owners --dir ./exports
//! ```

use std::path::Path;

use pharmacy_admin::AdminClient;
use pharmacy_admin::services::ExportKind;

use super::CliError;
use crate::output::Output;

/// # Errors
///
/// Returns `Invalid export type` for an unknown kind, "Failed to export
/// data" if the backend refuses, or an I/O error writing the file.
pub async fn run(app: &AdminClient, out: &Output, kind: &str, dir: &Path) -> Result<(), CliError> {
    let kind: ExportKind = kind.parse()?;
    let path = app.export.export(kind, dir).await?;
    out.note(format!("Saved {}", path.display()));
    Ok(())
}
