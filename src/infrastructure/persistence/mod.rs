//! PostgreSQL repository implementations.
//!
//! Queries are built at runtime with `sqlx::query_as` and mapped through
//! `FromRow`, so the crate builds without a live database.
//!
//! - [`PgUserRepository`] - accounts
//! - [`PgSessionRepository`] - cookie sessions
//! - [`PgCvRepository`] - CVs (creation is transactional with initial sections)
//! - [`PgSectionRepository`] - CV sections
//! - [`PgDownloadLogRepository`] - append-only download audit log

pub mod pg_cv_repository;
pub mod pg_download_log_repository;
pub mod pg_section_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;

pub use pg_cv_repository::PgCvRepository;
pub use pg_download_log_repository::PgDownloadLogRepository;
pub use pg_section_repository::PgSectionRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;
