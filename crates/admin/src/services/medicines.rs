//! Medicine catalogue management (`/admin/medicines`).
//!
//! Creation and updates are multipart: text fields plus front and back
//! package photos.

use reqwest::multipart::Form;
use tracing::instrument;

use pharmacy_admin_core::{Medicine, MedicineId, MedicineStatus, MedicineUpdate, NewMedicine};

use super::upload::ImageFile;
use crate::error::{AdminError, ValidationError};
use crate::http::HttpClient;

const BASE_PATH: &str = "/admin/medicines";

#[derive(Debug, Clone)]
pub struct MedicineService {
    http: HttpClient,
}

impl MedicineService {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Medicine>, AdminError> {
        self.http
            .get_json(BASE_PATH)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch medicines"))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, id: &MedicineId) -> Result<Medicine, AdminError> {
        self.http
            .get_json(&item_path(id))
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch medicine"))
    }

    /// Create a medicine with both package photos.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the title is blank; otherwise an
    /// error if the backend rejects it.
    #[instrument(skip(self, medicine, front, back), fields(title = %medicine.title))]
    pub async fn create(
        &self,
        medicine: &NewMedicine,
        front: ImageFile,
        back: ImageFile,
    ) -> Result<Medicine, AdminError> {
        if medicine.title.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "Title" }.into());
        }

        let mut form = Form::new()
            .text("title", medicine.title.clone())
            .text("description", medicine.description.clone());
        if let Some(status) = medicine.status {
            form = form.text("status", status.as_str());
        }
        let form = form
            .part("frontImage", front.into_part()?)
            .part("backImage", back.into_part()?);

        let created: Medicine = self
            .http
            .post_multipart(BASE_PATH, form)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to create medicine"))?;
        tracing::info!(id = %created.id, "Medicine created");
        Ok(created)
    }

    /// Update only the fields and photos that are provided.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if nothing would change; otherwise an
    /// error if the backend rejects it.
    #[instrument(skip(self, update, front, back), fields(id = %id))]
    pub async fn update(
        &self,
        id: &MedicineId,
        update: &MedicineUpdate,
        front: Option<ImageFile>,
        back: Option<ImageFile>,
    ) -> Result<Medicine, AdminError> {
        let mut form = Form::new();
        let mut fields = 0_usize;

        if let Some(title) = &update.title {
            form = form.text("title", title.clone());
            fields += 1;
        }
        if let Some(description) = &update.description {
            form = form.text("description", description.clone());
            fields += 1;
        }
        if let Some(status) = update.status {
            form = form.text("status", status.as_str());
            fields += 1;
        }
        if let Some(front) = front {
            form = form.part("frontImage", front.into_part()?);
            fields += 1;
        }
        if let Some(back) = back {
            form = form.part("backImage", back.into_part()?);
            fields += 1;
        }
        if fields == 0 {
            return Err(ValidationError::EmptyUpdate.into());
        }

        self.http
            .patch_multipart(&item_path(id), form)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to update medicine"))
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &MedicineId) -> Result<(), AdminError> {
        self.http
            .delete(&item_path(id))
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to delete medicine"))?;
        tracing::info!("Medicine deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Medicine>, AdminError> {
        self.http
            .get_json_with_query(&format!("{BASE_PATH}/search"), &[("q", query)])
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to search medicines"))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_by_status(
        &self,
        status: MedicineStatus,
    ) -> Result<Vec<Medicine>, AdminError> {
        self.http
            .get_json_with_query(BASE_PATH, &[("status", status.as_str())])
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch medicines by status"))
    }
}

fn item_path(id: &MedicineId) -> String {
    format!("{BASE_PATH}/{}", urlencoding::encode(id.as_str()))
}
