//! Pharmacy Admin Core - Shared types library.
//!
//! This crate provides the domain types used across the admin client:
//! - `pharmacy-admin` - Session pipeline, HTTP client and resource services
//! - `pharmacy-admin-cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, IDs, statuses, identities,
//!   locations and working hours

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
