//! Repository trait for CV sections.

use crate::domain::entities::{CvSection, NewSection, SectionPatch};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn create(&self, cv_id: Uuid, new_section: NewSection) -> Result<CvSection, AppError>;

    /// Sections of a CV ordered by `display_order`, then `created_at`.
    async fn list_for_cv(&self, cv_id: Uuid) -> Result<Vec<CvSection>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CvSection>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the section does not exist.
    async fn update(&self, id: Uuid, patch: SectionPatch) -> Result<CvSection, AppError>;

    /// Returns `false` if the section did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
