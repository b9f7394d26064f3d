//! Medicine catalogue commands.
//!
//! # Usage
//!
//! ```bash
//! pa-cli medicines create -t Panadol --front front.jpg --back back.png
//! pa-cli medicines update 65f1c0ffee --status unavailable
//! ```

use std::path::PathBuf;

use pharmacy_admin::AdminClient;
use pharmacy_admin::services::ImageFile;
use pharmacy_admin_core::{MedicineId, MedicineStatus, MedicineUpdate, NewMedicine};

use super::{CliError, parse_status};
use crate::output::{self, Output};

pub struct CreateInput {
    pub title: String,
    pub description: String,
    pub status: Option<String>,
    pub front: PathBuf,
    pub back: PathBuf,
}

pub struct UpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub front: Option<PathBuf>,
    pub back: Option<PathBuf>,
}

fn status(raw: Option<&str>) -> Result<Option<MedicineStatus>, CliError> {
    raw.map(parse_status::<MedicineStatus>).transpose()
}

async fn image(path: Option<&PathBuf>) -> Result<Option<ImageFile>, CliError> {
    match path {
        Some(path) => Ok(Some(ImageFile::from_path(path).await?)),
        None => Ok(None),
    }
}

/// # Errors
///
/// Returns an error if the status is unknown or the request fails.
pub async fn list(app: &AdminClient, out: &Output, status: Option<&str>) -> Result<(), CliError> {
    let items = match self::status(status)? {
        Some(status) => app.medicines.list_by_status(status).await?,
        None => app.medicines.list().await?,
    };
    out.emit(items.as_slice(), output::medicines)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn show(app: &AdminClient, out: &Output, id: &str) -> Result<(), CliError> {
    let medicine = app.medicines.get(&MedicineId::new(id)).await?;
    out.emit(&medicine, output::medicine)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn search(app: &AdminClient, out: &Output, query: &str) -> Result<(), CliError> {
    let items = app.medicines.search(query).await?;
    out.emit(items.as_slice(), output::medicines)
}

/// # Errors
///
/// Returns an error if a photo cannot be read or the backend rejects the medicine.
pub async fn create(app: &AdminClient, out: &Output, input: CreateInput) -> Result<(), CliError> {
    let medicine = NewMedicine {
        title: input.title,
        description: input.description,
        status: status(input.status.as_deref())?,
    };
    let front = ImageFile::from_path(&input.front).await?;
    let back = ImageFile::from_path(&input.back).await?;

    let created = app.medicines.create(&medicine, front, back).await?;
    out.note(format!("Created medicine {}", created.id));
    out.emit(&created, output::medicine)
}

/// # Errors
///
/// Returns `Nothing to update` if no flag was given, or the backend's rejection.
pub async fn update(
    app: &AdminClient,
    out: &Output,
    id: &str,
    input: UpdateInput,
) -> Result<(), CliError> {
    let update = MedicineUpdate {
        title: input.title,
        description: input.description,
        status: status(input.status.as_deref())?,
    };
    let front = image(input.front.as_ref()).await?;
    let back = image(input.back.as_ref()).await?;

    let updated = app
        .medicines
        .update(&MedicineId::new(id), &update, front, back)
        .await?;
    out.emit(&updated, output::medicine)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn delete(app: &AdminClient, id: &str) -> Result<(), CliError> {
    app.medicines.delete(&MedicineId::new(id)).await?;
    tracing::info!(id, "Medicine deleted");
    Ok(())
}
