//! Status enums for the managed entities.
//!
//! The backend exchanges statuses as lowercase strings (`"active"`,
//! `"banned"`, ...), both in JSON bodies and in `?status=` query filters.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {entity} status: {value}")]
pub struct StatusParseError {
    /// Which entity the status belongs to.
    pub entity: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Pharmacy listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PharmacyStatus {
    /// Visible to app users.
    #[default]
    Active,
    /// Hidden from app users.
    Inactive,
}

/// Medicine availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MedicineStatus {
    #[default]
    Available,
    Unavailable,
}

/// App user account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    /// Banned by an admin; the user can no longer sign in to the app.
    Banned,
}

impl PharmacyStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl MedicineStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

impl UserStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Banned => "banned",
        }
    }

    /// The status an admin toggles to from this one (ban/unban).
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Banned,
            Self::Banned => Self::Active,
        }
    }
}

impl fmt::Display for PharmacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MedicineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PharmacyStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(StatusParseError {
                entity: "pharmacy",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for MedicineStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            _ => Err(StatusParseError {
                entity: "medicine",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for UserStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "banned" => Ok(Self::Banned),
            _ => Err(StatusParseError {
                entity: "user",
                value: s.to_owned(),
            }),
        }
    }
}
