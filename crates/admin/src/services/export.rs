//! Spreadsheet exports (`/admin/export/*`).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::instrument;

use crate::error::AdminError;
use crate::http::HttpClient;

const EXPORT_FAILED: &str = "Failed to export data";

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Pharmacies,
    Medicines,
    /// Pharmacy owner accounts.
    Owners,
}

impl ExportKind {
    pub const ALL: [Self; 3] = [Self::Pharmacies, Self::Medicines, Self::Owners];

    /// Name used on the command line and in file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pharmacies => "pharmacies",
            Self::Medicines => "medicines",
            Self::Owners => "owners",
        }
    }

    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Pharmacies => "/admin/export/pharmacies",
            Self::Medicines => "/admin/export/medicines",
            Self::Owners => "/admin/export/pharmacy-owners",
        }
    }

    /// `{kind}-{unix_millis}.xlsx`
    #[must_use]
    pub fn file_name(self, unix_millis: i64) -> String {
        format!("{}-{unix_millis}.xlsx", self.as_str())
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AdminError::InvalidExportType(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ExportService {
    http: HttpClient,
}

impl ExportService {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Download an export and save it into `dir`, returning the file path.
    ///
    /// # Errors
    ///
    /// Returns "Failed to export data" if the backend rejects the export,
    /// `AdminError::SessionExpired` on 401, or `AdminError::Io` if the file
    /// cannot be written.
    #[instrument(skip(self, dir), fields(kind = %kind))]
    pub async fn export(&self, kind: ExportKind, dir: &Path) -> Result<PathBuf, AdminError> {
        let bytes = self
            .http
            .get_bytes(kind.endpoint())
            .await
            .map_err(|e| match AdminError::from_api(e, EXPORT_FAILED) {
                AdminError::Api { status, .. } => AdminError::Api {
                    status,
                    message: EXPORT_FAILED.to_string(),
                },
                other => other,
            })?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(kind.file_name(chrono::Utc::now().timestamp_millis()));
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Export saved");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_kinds() {
        assert_eq!("pharmacies".parse::<ExportKind>().unwrap(), ExportKind::Pharmacies);
        assert_eq!("owners".parse::<ExportKind>().unwrap(), ExportKind::Owners);

        let err = "orders".parse::<ExportKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidExportType);
        assert_eq!(err.to_string(), "Invalid export type: orders");
    }

    #[test]
    fn test_owner_export_endpoint() {
        assert_eq!(
            ExportKind::Owners.endpoint(),
            "/admin/export/pharmacy-owners"
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            ExportKind::Medicines.file_name(1_700_000_000_000),
            "medicines-1700000000000.xlsx"
        );
    }
}
