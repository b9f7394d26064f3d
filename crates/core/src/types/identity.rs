//! The authenticated administrator principal.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::email::Email;
use super::id::AdminId;

/// An authenticated admin, as returned by the login and registration
/// endpoints and as persisted between runs.
///
/// Either a whole identity exists or none does: `name` must be non-empty and
/// `email` must be a valid address, and deserialization enforces both.
/// `Debug` redacts the bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    /// Backend identifier, when the backend sends one (`id` or `_id`).
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<AdminId>,
    /// Display name.
    #[serde(deserialize_with = "non_empty_string")]
    pub name: String,
    /// Login email.
    pub email: Email,
    /// Opaque bearer credential, if the backend issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AdminIdentity {
    /// Build an identity without a backend ID.
    #[must_use]
    pub fn new(name: impl Into<String>, email: Email, token: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email,
            token,
        }
    }

    /// The bearer token, ignoring empty strings.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for AdminIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminIdentity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(serde::de::Error::custom("name cannot be empty"));
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_response() {
        let json = r#"{
            "_id": "65f0",
            "name": "Admin",
            "email": "admin@x.com",
            "token": "abc",
            "role": "admin"
        }"#;
        let identity: AdminIdentity = serde_json::from_str(json).unwrap();

        assert_eq!(identity.id, Some(AdminId::new("65f0")));
        assert_eq!(identity.name, "Admin");
        assert_eq!(identity.email.as_str(), "admin@x.com");
        assert_eq!(identity.bearer_token(), Some("abc"));
    }

    #[test]
    fn test_token_is_optional() {
        let json = r#"{"name":"Admin","email":"admin@x.com"}"#;
        let identity: AdminIdentity = serde_json::from_str(json).unwrap();
        assert!(identity.token.is_none());
        assert!(identity.bearer_token().is_none());

        let serialized = serde_json::to_string(&identity).unwrap();
        assert!(!serialized.contains("token"));
    }

    #[test]
    fn test_empty_token_is_not_a_bearer() {
        let identity =
            AdminIdentity::new("Admin", Email::parse("a@b.c").unwrap(), Some(String::new()));
        assert!(identity.bearer_token().is_none());
    }

    #[test]
    fn test_partial_identity_is_rejected() {
        assert!(serde_json::from_str::<AdminIdentity>(r#"{"name":"Admin"}"#).is_err());
        assert!(serde_json::from_str::<AdminIdentity>(r#"{"email":"a@b.c"}"#).is_err());
        assert!(
            serde_json::from_str::<AdminIdentity>(r#"{"name":"  ","email":"a@b.c"}"#).is_err()
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let identity = AdminIdentity::new(
            "Admin",
            Email::parse("admin@x.com").unwrap(),
            Some("super-secret-token".to_string()),
        );
        let debug_output = format!("{identity:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-token"));
    }
}
