//! Registration form validation.

use secrecy::{ExposeSecret, SecretString};

use pharmacy_admin_core::{Email, validate_new_password};

use crate::error::ValidationError;

/// What the operator typed into the registration form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// A registration form that passed every client-side check.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

impl RegistrationForm {
    /// Check the form in the order the fields appear.
    ///
    /// # Errors
    ///
    /// Returns the first failing check: empty name, malformed email, password
    /// shorter than six characters, or a confirmation that does not match.
    pub fn validate(&self) -> Result<ValidRegistration, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let email = Email::parse(&self.email)?;
        validate_new_password(
            self.password.expose_secret(),
            self.confirm_password.expose_secret(),
        )?;

        Ok(ValidRegistration {
            name: name.to_string(),
            email,
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pharmacy_admin_core::{EmailError, PasswordError};

    fn form(name: &str, email: &str, password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            name: name.to_string(),
            email: email.to_string(),
            password: SecretString::from(password.to_string()),
            confirm_password: SecretString::from(confirm.to_string()),
        }
    }

    #[test]
    fn test_valid_form() {
        let valid = form(" Admin ", "admin@x.com", "secret1", "secret1")
            .validate()
            .unwrap();
        assert_eq!(valid.name, "Admin");
        assert_eq!(valid.email.as_str(), "admin@x.com");
    }

    #[test]
    fn test_short_password() {
        let err = form("Admin", "admin@x.com", "12345", "12345")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Password(PasswordError::TooShort { min: 6 })
        );
        assert_eq!(err.to_string(), "Password must be at least 6 characters long");
    }

    #[test]
    fn test_mismatched_confirmation() {
        let err = form("Admin", "admin@x.com", "secret1", "secret2")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_name_and_email_checked_first() {
        assert_eq!(
            form("  ", "admin@x.com", "1", "2").validate().unwrap_err(),
            ValidationError::EmptyName
        );
        assert_eq!(
            form("Admin", "not-an-email", "1", "2").validate().unwrap_err(),
            ValidationError::Email(EmailError::MissingAtSymbol)
        );
    }

    #[test]
    fn test_debug_hides_passwords() {
        let debug = format!("{:?}", form("Admin", "admin@x.com", "secret1", "secret1"));
        assert!(!debug.contains("secret1"));
    }
}
