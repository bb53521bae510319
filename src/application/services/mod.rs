//! Business logic services for the application layer.

pub mod auth_service;
pub mod cv_service;
pub mod export_service;
pub mod section_service;

pub use auth_service::{AuthService, IssuedSession};
pub use cv_service::CvService;
pub use export_service::{ExportService, PdfDownload};
pub use section_service::SectionService;
