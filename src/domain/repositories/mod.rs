//! Repository traits for the domain layer.
//!
//! Services depend on these traits only. PostgreSQL implementations live in
//! [`crate::infrastructure::persistence`], and `mockall` generates a
//! `Mock*` double for each trait under `cfg(test)`.
//!
//! - [`UserRepository`] - accounts
//! - [`SessionRepository`] - cookie sessions
//! - [`CvRepository`] - CVs and their lifecycle
//! - [`SectionRepository`] - ordered CV sections
//! - [`DownloadLogRepository`] - PDF download audit trail

pub mod cv_repository;
pub mod download_log_repository;
pub mod section_repository;
pub mod session_repository;
pub mod user_repository;

pub use cv_repository::CvRepository;
pub use download_log_repository::DownloadLogRepository;
pub use section_repository::SectionRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use cv_repository::MockCvRepository;
#[cfg(test)]
pub use download_log_repository::MockDownloadLogRepository;
#[cfg(test)]
pub use section_repository::MockSectionRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
