//! App user management (`/admin/users`).

use serde::Serialize;
use tracing::instrument;

use pharmacy_admin_core::{NewUser, User, UserId, UserStatistics, UserStatus};

use crate::error::{AdminError, ValidationError};
use crate::http::HttpClient;

const BASE_PATH: &str = "/admin/users";

#[derive(Serialize)]
struct StatusUpdate {
    status: UserStatus,
}

#[derive(Debug, Clone)]
pub struct UserService {
    http: HttpClient,
}

impl UserService {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<User>, AdminError> {
        self.http
            .get_json(BASE_PATH)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch users"))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, id: &UserId) -> Result<User, AdminError> {
        self.http
            .get_json(&item_path(id))
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch user"))
    }

    /// Create a user directly (used for testing accounts).
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the name is blank; otherwise an
    /// error if the backend rejects it.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: &NewUser) -> Result<User, AdminError> {
        if user.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.http
            .post_json(BASE_PATH, user)
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to create user"))
    }

    /// Ban or unban a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self), fields(id = %id, status = %status))]
    pub async fn update_status(&self, id: &UserId, status: UserStatus) -> Result<User, AdminError> {
        let user: User = self
            .http
            .patch_json(&format!("{}/status", item_path(id)), &StatusUpdate { status })
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to update user status"))?;
        tracing::info!("User status updated");
        Ok(user)
    }

    /// Flip a user between active and banned.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    pub async fn toggle_ban(&self, user: &User) -> Result<User, AdminError> {
        self.update_status(&user.id, user.status.toggled()).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &UserId) -> Result<(), AdminError> {
        self.http
            .delete(&item_path(id))
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to delete user"))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search(&self, query: &str) -> Result<Vec<User>, AdminError> {
        self.http
            .get_json_with_query(&format!("{BASE_PATH}/search"), &[("q", query)])
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to search users"))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_by_status(&self, status: UserStatus) -> Result<Vec<User>, AdminError> {
        self.http
            .get_json_with_query(BASE_PATH, &[("status", status.as_str())])
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch users by status"))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn statistics(&self) -> Result<UserStatistics, AdminError> {
        self.http
            .get_json(&format!("{BASE_PATH}/statistics"))
            .await
            .map_err(|e| AdminError::from_api(e, "Failed to fetch statistics"))
    }
}

fn item_path(id: &UserId) -> String {
    format!("{BASE_PATH}/{}", urlencoding::encode(id.as_str()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_body() {
        let body = serde_json::to_value(StatusUpdate {
            status: UserStatus::Banned,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "banned"}));
    }

    #[test]
    fn test_item_path() {
        assert_eq!(item_path(&UserId::new("u1")), "/admin/users/u1");
    }
}
