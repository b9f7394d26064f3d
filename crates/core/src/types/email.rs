//! Email addresses for admins, pharmacy owners and app users.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why an address was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Empty,
    #[error("Email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("Email must contain an @")]
    MissingAtSymbol,
    #[error("Email must contain a single @")]
    MultipleAtSymbols,
    #[error("Email is missing the name before the @")]
    EmptyLocalPart,
    #[error("Email is missing the domain after the @")]
    EmptyDomain,
}

/// A trimmed address with exactly one `@` and text on both sides of it.
///
/// The backend has the final word on what it accepts. Parsing here only keeps
/// a login or an owner form from going out with a blank or mangled address,
/// and the stored session goes through the same check when it is read back.
///
/// ```
/// use pharmacy_admin_core::Email;
///
/// let owner = Email::parse(" owner@cedars-pharmacy.lb ").unwrap();
/// assert_eq!(owner.as_str(), "owner@cedars-pharmacy.lb");
/// assert!(Email::parse("cedars-pharmacy.lb").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Trim and check `input`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] the trimmed input runs into.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let address = input.trim();
        if address.is_empty() {
            return Err(EmailError::Empty);
        }
        if address.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (name, domain) = address
            .split_once('@')
            .ok_or(EmailError::MissingAtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::MultipleAtSymbols);
        }
        if name.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(address.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_admin_and_owner_addresses() {
        for address in [
            "admin@x.com",
            "night.shift+dispatch@cedars-pharmacy.lb",
            "owner@branch.hamra.example.com",
        ] {
            assert_eq!(Email::parse(address).unwrap().as_str(), address);
        }
    }

    #[test]
    fn test_login_field_whitespace_is_trimmed() {
        let email: Email = "\tadmin@x.com \n".parse().unwrap();
        assert_eq!(email.to_string(), "admin@x.com");
    }

    #[test]
    fn test_blank_login_field() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_rejects_malformed_owner_email() {
        let cases = [
            ("cedars-pharmacy.lb", EmailError::MissingAtSymbol),
            ("owner@cedars@pharmacy.lb", EmailError::MultipleAtSymbols),
            ("@cedars-pharmacy.lb", EmailError::EmptyLocalPart),
            ("owner@", EmailError::EmptyDomain),
        ];
        for (input, expected) in cases {
            assert_eq!(Email::parse(input), Err(expected), "{input}");
        }
    }

    #[test]
    fn test_length_limit() {
        let at_limit = format!("{}@x.com", "p".repeat(Email::MAX_LENGTH - 6));
        assert!(Email::parse(&at_limit).is_ok());

        let over = format!("p{at_limit}");
        assert_eq!(
            Email::parse(&over),
            Err(EmailError::TooLong {
                max: Email::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_error_messages_read_as_form_hints() {
        assert_eq!(EmailError::Empty.to_string(), "Email is required");
        assert_eq!(
            EmailError::TooLong { max: 254 }.to_string(),
            "Email must be at most 254 characters"
        );
    }

    #[test]
    fn test_stored_session_email_is_checked() {
        let email: Email = serde_json::from_str("\"owner@cedars-pharmacy.lb\"").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"owner@cedars-pharmacy.lb\"");

        assert!(serde_json::from_str::<Email>("\"owner-at-cedars\"").is_err());
        assert!(serde_json::from_str::<Email>("\"\"").is_err());
    }
}
