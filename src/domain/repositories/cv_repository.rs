//! Repository trait for CVs.

use crate::domain::entities::{Cv, CvPatch, NewCv};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCvRepository`]
///
/// See `tests/repository_cv.rs` for behaviour against a real database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CvRepository: Send + Sync {
    /// Inserts the CV and its initial sections in one transaction, unless the
    /// owner already holds `max_active` non-deleted CVs.
    ///
    /// Returns `None` when the limit is reached. The owner's row is locked for
    /// the count, so concurrent creates for one user cannot overshoot.
    async fn create(&self, new_cv: NewCv, max_active: i64) -> Result<Option<Cv>, AppError>;

    /// Finds a CV by id, including soft-deleted ones.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Cv>, AppError>;

    /// Non-deleted CVs of a user, most recently updated first.
    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<Cv>, AppError>;

    /// Applies a metadata patch and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the CV does not exist or is deleted.
    async fn update_meta(&self, id: Uuid, patch: CvPatch) -> Result<Cv, AppError>;

    /// Marks the CV deleted. Returns `false` if it was already deleted or missing.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Bumps `updated_at` after a section change.
    async fn touch(&self, id: Uuid) -> Result<(), AppError>;
}
