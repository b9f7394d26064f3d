//! Core types for the pharmacy admin client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod hours;
pub mod id;
pub mod identity;
pub mod location;
pub mod password;
pub mod records;
pub mod status;

pub use email::{Email, EmailError};
pub use hours::{DaySchedule, WorkingHours, WorkingHoursError, parse_time};
pub use id::*;
pub use identity::AdminIdentity;
pub use location::{Location, LocationError};
pub use password::{MIN_PASSWORD_LENGTH, PasswordError, validate_new_password};
pub use records::*;
pub use status::*;
