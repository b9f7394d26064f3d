//! Services over the admin REST backend.
//!
//! # Services
//!
//! - `auth` - Login, registration and logout; the only session writer
//! - `pharmacies` - Pharmacy CRUD, search and photo upload
//! - `medicines` - Medicine CRUD with multipart package photos
//! - `users` - App user listing, banning and statistics
//! - `dashboard` - Concurrent fetch and chart aggregation
//! - `export` - Spreadsheet downloads
//!
//! Every service shares one [`HttpClient`](crate::http::HttpClient), so every
//! call carries the bearer token and any 401 ends the session.

pub mod auth;
pub mod dashboard;
pub mod export;
pub mod medicines;
pub mod pharmacies;
pub mod upload;
pub mod users;

pub use auth::{AuthService, RegistrationForm, ValidRegistration};
pub use dashboard::{ChartSeries, DashboardData, DashboardService, DashboardStats, aggregate};
pub use export::{ExportKind, ExportService};
pub use medicines::MedicineService;
pub use pharmacies::PharmacyService;
pub use upload::ImageFile;
pub use users::UserService;
