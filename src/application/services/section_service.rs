//! Section CRUD scoped to a CV and its owner.

use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::cv_service::ensure_owner;
use crate::domain::content::validate_content;
use crate::domain::entities::{Cv, CvSection, NewSection, SectionPatch};
use crate::domain::repositories::{CvRepository, SectionRepository};
use crate::error::AppError;
use serde_json::json;

pub const INVALID_SECTION: &str = "Invalid section";

pub struct SectionService<C: CvRepository, S: SectionRepository> {
    cv_repository: Arc<C>,
    section_repository: Arc<S>,
}

impl<C: CvRepository, S: SectionRepository> SectionService<C, S> {
    pub fn new(cv_repository: Arc<C>, section_repository: Arc<S>) -> Self {
        Self {
            cv_repository,
            section_repository,
        }
    }

    async fn active_cv(&self, cv_id: Uuid) -> Result<Cv, AppError> {
        self.cv_repository
            .find_by_id(cv_id)
            .await?
            .filter(|cv| !cv.is_deleted)
            .ok_or_else(|| AppError::not_found("CV not found", json!({ "cv_id": cv_id })))
    }

    async fn owned_cv(&self, cv_id: Uuid, user_id: Uuid) -> Result<Cv, AppError> {
        let cv = self.active_cv(cv_id).await?;
        ensure_owner(&cv, user_id)?;
        Ok(cv)
    }

    /// Loads a section and checks that it belongs to `cv_id`.
    async fn section_of(&self, cv_id: Uuid, section_id: Uuid) -> Result<CvSection, AppError> {
        let section = self
            .section_repository
            .find_by_id(section_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Section not found", json!({ "section_id": section_id }))
            })?;

        if section.cv_id != cv_id {
            return Err(AppError::bad_request(
                INVALID_SECTION,
                json!({ "section_id": section_id, "cv_id": cv_id }),
            ));
        }

        Ok(section)
    }

    /// Sections of a non-deleted CV in display order. No ownership check.
    pub async fn list(&self, cv_id: Uuid) -> Result<Vec<CvSection>, AppError> {
        let cv = self.active_cv(cv_id).await?;
        self.section_repository.list_for_cv(cv.id).await
    }

    pub async fn create(
        &self,
        cv_id: Uuid,
        user_id: Uuid,
        new_section: NewSection,
    ) -> Result<CvSection, AppError> {
        let cv = self.owned_cv(cv_id, user_id).await?;
        validate_content(&new_section.content)?;

        let section = self.section_repository.create(cv.id, new_section).await?;
        self.cv_repository.touch(cv.id).await?;

        tracing::debug!(cv_id = %cv.id, section_id = %section.id, section_type = %section.section_type, "Section created");
        Ok(section)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with "Invalid section" if the section
    /// belongs to a different CV.
    pub async fn update(
        &self,
        cv_id: Uuid,
        section_id: Uuid,
        user_id: Uuid,
        patch: SectionPatch,
    ) -> Result<CvSection, AppError> {
        let cv = self.owned_cv(cv_id, user_id).await?;
        let section = self.section_of(cv.id, section_id).await?;

        if let Some(content) = patch.content.as_ref() {
            validate_content(content)?;
        }

        let updated = self.section_repository.update(section.id, patch).await?;
        self.cv_repository.touch(cv.id).await?;

        Ok(updated)
    }

    pub async fn delete(&self, cv_id: Uuid, section_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let cv = self.owned_cv(cv_id, user_id).await?;
        let section = self.section_of(cv.id, section_id).await?;

        if !self.section_repository.delete(section.id).await? {
            return Err(AppError::not_found(
                "Section not found",
                json!({ "section_id": section_id }),
            ));
        }
        self.cv_repository.touch(cv.id).await?;

        tracing::debug!(cv_id = %cv.id, section_id = %section_id, "Section deleted");
        Ok(())
    }
}
