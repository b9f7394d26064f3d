//! Wire records exchanged with the admin REST endpoints.
//!
//! Field names follow the backend's camelCase JSON. Identifiers accept either
//! `id` or `_id`.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::hours::WorkingHours;
use super::id::{MedicineId, PharmacyId, UserId};
use super::location::Location;
use super::status::{MedicineStatus, PharmacyStatus, UserStatus};

// =============================================================================
// Pharmacies
// =============================================================================

/// A pharmacy as listed by `/admin/pharmacies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacy {
    #[serde(alias = "_id")]
    pub id: PharmacyId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default = "WorkingHours::default")]
    pub working_hours: WorkingHours,
    pub status: PharmacyStatus,
    /// Number of medicines stocked, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_count: Option<u64>,
}

impl Pharmacy {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PharmacyStatus::Active
    }
}

/// Body of a pharmacy creation request. Also creates the owner account.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPharmacy {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub location: Location,
    pub owner_name: String,
    pub owner_email: Email,
    pub owner_password: String,
    pub working_hours: WorkingHours,
    pub status: PharmacyStatus,
}

impl fmt::Debug for NewPharmacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPharmacy")
            .field("title", &self.title)
            .field("location", &self.location)
            .field("owner_name", &self.owner_name)
            .field("owner_email", &self.owner_email)
            .field("owner_password", &"[REDACTED]")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Partial pharmacy update sent with PATCH. Unset fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PharmacyStatus>,
}

impl PharmacyUpdate {
    /// True when no field would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.location.is_none()
            && self.working_hours.is_none()
            && self.status.is_none()
    }
}

// =============================================================================
// Medicines
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    #[serde(alias = "_id")]
    pub id: MedicineId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_image_url: Option<String>,
    pub status: MedicineStatus,
}

/// Text fields of a new medicine. Both images travel alongside as multipart parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedicine {
    pub title: String,
    pub description: String,
    pub status: Option<MedicineStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicineUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<MedicineStatus>,
}

// =============================================================================
// Users
// =============================================================================

/// A mobile-app user managed from the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub status: UserStatus,
}

impl User {
    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.status == UserStatus::Banned
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Totals from `/admin/users/statistics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub banned_users: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pharmacy_from_backend() {
        let json = r#"{
            "_id": "p1",
            "title": "Cedars Pharmacy",
            "description": "Open late",
            "imageUrl": "https://cdn.example.com/p1.jpg",
            "location": {"latitude": 33.9, "longitude": 35.5, "address": "Hamra"},
            "status": "active",
            "medicineCount": 12
        }"#;
        let pharmacy: Pharmacy = serde_json::from_str(json).unwrap();

        assert_eq!(pharmacy.id.as_str(), "p1");
        assert!(pharmacy.is_active());
        assert_eq!(pharmacy.medicine_count, Some(12));
        // Missing working hours fall back to the default week.
        assert_eq!(pharmacy.working_hours, WorkingHours::default());
    }

    #[test]
    fn test_pharmacy_update_skips_unset_fields() {
        let update = PharmacyUpdate {
            status: Some(PharmacyStatus::Inactive),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"status": "inactive"})
        );
        assert!(PharmacyUpdate::default().is_empty());
    }

    #[test]
    fn test_new_pharmacy_wire_format_and_debug() {
        let new = NewPharmacy {
            title: "Cedars".to_string(),
            description: String::new(),
            image_url: None,
            location: Location::default(),
            owner_name: "Rami".to_string(),
            owner_email: Email::parse("owner@x.com").unwrap(),
            owner_password: "hunter22".to_string(),
            working_hours: WorkingHours::default(),
            status: PharmacyStatus::Active,
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["ownerEmail"], "owner@x.com");
        assert_eq!(json["ownerPassword"], "hunter22");
        assert!(json.get("imageUrl").is_none());

        assert!(!format!("{new:?}").contains("hunter22"));
    }

    #[test]
    fn test_user_and_statistics() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","name":"Lina","email":"lina@x.com","status":"banned"}"#,
        )
        .unwrap();
        assert!(user.is_banned());
        assert!(user.location.is_none());

        let stats: UserStatistics =
            serde_json::from_str(r#"{"totalUsers":10,"activeUsers":8,"bannedUsers":2}"#).unwrap();
        assert_eq!(stats.total_users, 10);
        assert_eq!(stats.banned_users, 2);
    }
}
