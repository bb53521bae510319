//! Application layer: business rules over the domain repositories.
//!
//! Services are generic over repository traits so they can be unit tested
//! against mockall doubles and wired to PostgreSQL in [`crate::state`].
//!
//! - [`services::AuthService`] - accounts, passwords and cookie sessions
//! - [`services::CvService`] - CV lifecycle, ownership and the per-user limit
//! - [`services::SectionService`] - section CRUD within an owned CV
//! - [`services::ExportService`] - cached HTML preview and PDF download
//! - [`document`] - CV to HTML rendering shared by preview and PDF

pub mod document;
pub mod services;
