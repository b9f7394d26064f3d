//! Password rules applied before a registration request is sent.

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Why a new password was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must be at least {min} characters long")]
    TooShort { min: usize },
    #[error("Passwords do not match")]
    Mismatch,
}

/// Check a new password and its confirmation.
///
/// Length is checked first, so a short password is reported as too short
/// even when the confirmation also differs.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` or `PasswordError::Mismatch`.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if password != confirmation {
        return Err(PasswordError::Mismatch);
    }
    Ok(())
}
