//! Geographic location attached to pharmacies and app users.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Location`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),
    #[error("longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),
}

/// A point on the map with an optional human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Default map centre used when a pharmacy has no location yet (Beirut).
    pub const DEFAULT_LATITUDE: f64 = 33.8938;
    pub const DEFAULT_LONGITUDE: f64 = 35.5018;

    /// Create a validated location.
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is out of range or not finite.
    pub fn new(
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> Result<Self, LocationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::LongitudeOutOfRange(longitude));
        }
        let address = address.filter(|a| !a.trim().is_empty());
        Ok(Self {
            latitude,
            longitude,
            address,
        })
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: Self::DEFAULT_LATITUDE,
            longitude: Self::DEFAULT_LONGITUDE,
            address: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address.as_deref().filter(|a| !a.is_empty()) {
            Some(address) => f.write_str(address),
            None => write!(f, "{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}
