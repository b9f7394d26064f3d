//! Pharmacy management (`/admin/pharmacies`).

use reqwest::multipart::Form;
use serde::Deserialize;
use tracing::instrument;

use pharmacy_admin_core::{
    NewPharmacy, Pharmacy, PharmacyId, PharmacyStatus, PharmacyUpdate, validate_new_password,
};

use super::upload::ImageFile;
use crate::error::{AdminError, ValidationError};
use crate::http::HttpClient;

const BASE_PATH: &str = "/admin/pharmacies";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    image_url: String,
}

/// Pharmacy CRUD and search.
#[derive(Debug, Clone)]
pub struct PharmacyService {
    http: HttpClient,
}

impl PharmacyService {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Upload a pharmacy photo and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, image), fields(file = %image.file_name))]
    pub async fn upload_image(&self, image: ImageFile) -> Result<String, AdminError> {
        let form = Form::new().part("image", image.into_part()?);
        let response: UploadResponse = self
            .http
            .post_multipart(&format!("{BASE_PATH}/upload-image"), form)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to upload image"))?;
        Ok(response.image_url)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Pharmacy>, AdminError> {
        self.http
            .get_json(BASE_PATH)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch pharmacies"))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, id: &PharmacyId) -> Result<Pharmacy, AdminError> {
        self.http
            .get_json(&item_path(id))
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch pharmacy"))
    }

    /// Create a pharmacy together with its owner account.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` before sending if the title or owner
    /// name is blank, the owner password is too short, or the working hours
    /// are inconsistent; otherwise an error if the backend rejects it.
    #[instrument(skip(self, pharmacy), fields(title = %pharmacy.title))]
    pub async fn create(&self, pharmacy: &NewPharmacy) -> Result<Pharmacy, AdminError> {
        validate_new(pharmacy)?;
        let created: Pharmacy = self
            .http
            .post_json(BASE_PATH, pharmacy)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to create pharmacy"))?;
        tracing::info!(id = %created.id, "Pharmacy created");
        Ok(created)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the update is empty or its working
    /// hours are inconsistent; otherwise an error if the backend rejects it.
    #[instrument(skip(self, update), fields(id = %id))]
    pub async fn update(
        &self,
        id: &PharmacyId,
        update: &PharmacyUpdate,
    ) -> Result<Pharmacy, AdminError> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if let Some(hours) = &update.working_hours {
            hours.validate().map_err(ValidationError::from)?;
        }
        self.http
            .patch_json(&item_path(id), update)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to update pharmacy"))
    }

    /// Switch a pharmacy between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    pub async fn set_status(
        &self,
        id: &PharmacyId,
        status: PharmacyStatus,
    ) -> Result<Pharmacy, AdminError> {
        let update = PharmacyUpdate {
            status: Some(status),
            ..PharmacyUpdate::default()
        };
        self.update(id, &update).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &PharmacyId) -> Result<(), AdminError> {
        self.http
            .delete(&item_path(id))
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to delete pharmacy"))?;
        tracing::info!("Pharmacy deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Pharmacy>, AdminError> {
        self.http
            .get_json_with_query(&format!("{BASE_PATH}/search"), &[("q", query)])
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to search pharmacies"))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_by_status(
        &self,
        status: PharmacyStatus,
    ) -> Result<Vec<Pharmacy>, AdminError> {
        self.http
            .get_json_with_query(BASE_PATH, &[("status", status.as_str())])
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch pharmacies by status"))
    }
}

fn item_path(id: &PharmacyId) -> String {
    format!("{BASE_PATH}/{}", urlencoding::encode(id.as_str()))
}

fn validate_new(pharmacy: &NewPharmacy) -> Result<(), ValidationError> {
    if pharmacy.title.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "Title" });
    }
    if pharmacy.owner_name.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "Owner name",
        });
    }
    validate_new_password(&pharmacy.owner_password, &pharmacy.owner_password)?;
    pharmacy.working_hours.validate()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pharmacy_admin_core::{Email, Location, PasswordError, WorkingHours};

    fn new_pharmacy() -> NewPharmacy {
        NewPharmacy {
            title: "Cedars".to_string(),
            description: "Open late".to_string(),
            image_url: None,
            location: Location::default(),
            owner_name: "Rami".to_string(),
            owner_email: Email::parse("owner@x.com").unwrap(),
            owner_password: "hunter22".to_string(),
            working_hours: WorkingHours::default(),
            status: PharmacyStatus::Active,
        }
    }

    #[test]
    fn test_item_path_encodes_id() {
        assert_eq!(
            item_path(&PharmacyId::new("65f0")),
            "/admin/pharmacies/65f0"
        );
        assert_eq!(
            item_path(&PharmacyId::new("a/b")),
            "/admin/pharmacies/a%2Fb"
        );
    }

    #[test]
    fn test_validate_new() {
        assert!(validate_new(&new_pharmacy()).is_ok());

        let mut blank = new_pharmacy();
        blank.title = "  ".to_string();
        assert_eq!(
            validate_new(&blank),
            Err(ValidationError::MissingField { field: "Title" })
        );

        let mut weak = new_pharmacy();
        weak.owner_password = "123".to_string();
        assert_eq!(
            validate_new(&weak),
            Err(ValidationError::Password(PasswordError::TooShort { min: 6 }))
        );
    }
}
