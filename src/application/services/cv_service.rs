//! CV lifecycle: creation under the per-user limit, ownership checks and metadata edits.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::ats::{AtsReport, calculate_ats_score};
use crate::domain::entities::{Cv, CvDetail, CvPatch, NewCv, User};
use crate::domain::repositories::{CvRepository, SectionRepository};
use crate::domain::templates;
use crate::error::AppError;
use serde_json::json;

pub const TITLE_REQUIRED: &str = "CV title is required.";

pub struct CvService<C: CvRepository, S: SectionRepository> {
    cv_repository: Arc<C>,
    section_repository: Arc<S>,
    max_cvs_per_user: i64,
}

impl<C: CvRepository, S: SectionRepository> CvService<C, S> {
    pub fn new(cv_repository: Arc<C>, section_repository: Arc<S>, max_cvs_per_user: i64) -> Self {
        Self {
            cv_repository,
            section_repository,
            max_cvs_per_user,
        }
    }

    pub fn max_cvs_per_user(&self) -> i64 {
        self.max_cvs_per_user
    }

    /// Non-deleted CVs, most recently updated first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Cv>, AppError> {
        self.cv_repository.list_active_for_user(user_id).await
    }

    /// Creates a CV with the default personal section.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank title or unknown template, and
    /// [`AppError::Conflict`] once the user holds the maximum number of CVs.
    pub async fn create_cv(
        &self,
        owner: &User,
        title: &str,
        template_slug: Option<&str>,
    ) -> Result<Cv, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::bad_request(TITLE_REQUIRED, json!({ "field": "title" })));
        }
        if title.chars().count() > 255 {
            return Err(AppError::bad_request(
                "CV title must be at most 255 characters.",
                json!({ "field": "title" }),
            ));
        }

        let template_slug = template_slug
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(crate::domain::entities::cv::DEFAULT_TEMPLATE);
        ensure_known_template(template_slug)?;

        let cv = self
            .cv_repository
            .create(
                NewCv::with_defaults(
                    owner.id,
                    &owner.email,
                    title.to_string(),
                    template_slug.to_string(),
                ),
                self.max_cvs_per_user,
            )
            .await?
            .ok_or_else(|| {
                AppError::conflict(
                    format!(
                        "You have reached the maximum limit of {} CVs.",
                        self.max_cvs_per_user
                    ),
                    json!({ "limit": self.max_cvs_per_user }),
                )
            })?;

        tracing::info!(cv_id = %cv.id, user_id = %owner.id, template = %cv.template_slug, "CV created");
        Ok(cv)
    }

    /// Loads a non-deleted CV.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for missing and soft-deleted CVs alike.
    pub async fn get_active(&self, cv_id: Uuid) -> Result<Cv, AppError> {
        self.cv_repository
            .find_by_id(cv_id)
            .await?
            .filter(|cv| !cv.is_deleted)
            .ok_or_else(|| AppError::not_found("CV not found", json!({ "cv_id": cv_id })))
    }

    /// Loads a non-deleted CV owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] as [`Self::get_active`] does, and
    /// [`AppError::Forbidden`] if another user owns the CV.
    pub async fn get_owned(&self, cv_id: Uuid, user_id: Uuid) -> Result<Cv, AppError> {
        let cv = self.get_active(cv_id).await?;
        ensure_owner(&cv, user_id)?;
        Ok(cv)
    }

    pub async fn detail(&self, cv: Cv) -> Result<CvDetail, AppError> {
        let sections = self.section_repository.list_for_cv(cv.id).await?;
        Ok(CvDetail { cv, sections })
    }

    /// Soft-deletes a CV owned by `user_id`.
    pub async fn delete_cv(&self, cv_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let cv = self.get_owned(cv_id, user_id).await?;

        if !self.cv_repository.soft_delete(cv.id).await? {
            return Err(AppError::not_found("CV not found", json!({ "cv_id": cv_id })));
        }

        tracing::info!(cv_id = %cv_id, user_id = %user_id, "CV deleted");
        Ok(())
    }

    /// Applies a metadata patch and returns the CV with its sections.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unknown template or font pair.
    pub async fn update_meta(
        &self,
        cv_id: Uuid,
        user_id: Uuid,
        mut patch: CvPatch,
    ) -> Result<CvDetail, AppError> {
        let cv = self.get_owned(cv_id, user_id).await?;

        if let Some(title) = patch.title.as_mut() {
            *title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::bad_request(TITLE_REQUIRED, json!({ "field": "title" })));
            }
        }
        if let Some(slug) = patch.template_slug.as_deref() {
            ensure_known_template(slug)?;
        }
        if let Some(font_pair) = patch.font_pair.as_deref()
            && templates::find_font_pair(font_pair).is_none()
        {
            return Err(AppError::bad_request(
                "Unknown font pair",
                json!({ "field": "font_pair", "value": font_pair }),
            ));
        }

        let cv = if patch.is_empty() {
            cv
        } else {
            self.cv_repository.update_meta(cv.id, patch).await?
        };

        self.detail(cv).await
    }

    /// Scores a CV owned by `user_id`.
    pub async fn ats_report(&self, cv_id: Uuid, user_id: Uuid) -> Result<AtsReport, AppError> {
        let cv = self.get_owned(cv_id, user_id).await?;
        let sections = self.section_repository.list_for_cv(cv.id).await?;
        Ok(calculate_ats_score(&cv, &sections))
    }
}

pub(crate) fn ensure_owner(cv: &Cv, user_id: Uuid) -> Result<(), AppError> {
    if cv.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden("Unauthorized", json!({ "cv_id": cv.id })))
    }
}

fn ensure_known_template(slug: &str) -> Result<(), AppError> {
    if templates::is_known_template(slug) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Unknown template",
            json!({ "field": "template_slug", "value": slug }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CvSection;
    use crate::domain::repositories::{MockCvRepository, MockSectionRepository};
    use chrono::Utc;

    fn owner() -> User {
        User {
            id: Uuid::new_v4(),
            google_id: None,
            email: "ada@example.com".to_string(),
            display_name: Some("Ada".to_string()),
            photo_url: None,
            password_hash: None,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    fn create_test_cv(id: Uuid, user_id: Uuid) -> Cv {
        Cv {
            id,
            user_id,
            title: "My CV".to_string(),
            template_slug: "ats_clean".to_string(),
            primary_color: Some("#4285f4".to_string()),
            font_pair: None,
            is_deleted: false,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(
        cvs: MockCvRepository,
        sections: MockSectionRepository,
    ) -> CvService<MockCvRepository, MockSectionRepository> {
        CvService::new(Arc::new(cvs), Arc::new(sections), 10)
    }

    #[tokio::test]
    async fn test_create_cv_success() {
        let user = owner();
        let user_id = user.id;

        let mut cvs = MockCvRepository::new();
        cvs.expect_create()
            .withf(move |new_cv, max_active| {
                *max_active == 10
                    && new_cv.user_id == user_id
                    && new_cv.title == "Backend CV"
                    && new_cv.template_slug == "ats_modern"
                    && new_cv.sections.len() == 1
                    && new_cv.sections[0].section_type == "personal"
            })
            .times(1)
            .returning(move |new_cv, _| {
                let mut cv = create_test_cv(Uuid::new_v4(), new_cv.user_id);
                cv.title = new_cv.title;
                cv.template_slug = new_cv.template_slug;
                Ok(Some(cv))
            });

        let svc = service(cvs, MockSectionRepository::new());
        let cv = svc.create_cv(&user, "  Backend CV ", Some("ats_modern")).await.unwrap();

        assert_eq!(cv.title, "Backend CV");
    }

    #[tokio::test]
    async fn test_create_cv_defaults_template() {
        let mut cvs = MockCvRepository::new();
        cvs.expect_create()
            .withf(|new_cv, _| new_cv.template_slug == "ats_clean")
            .times(1)
            .returning(|new_cv, _| Ok(Some(create_test_cv(Uuid::new_v4(), new_cv.user_id))));

        let svc = service(cvs, MockSectionRepository::new());
        assert!(svc.create_cv(&owner(), "CV", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_cv_blank_title() {
        let mut cvs = MockCvRepository::new();
        cvs.expect_create().never();

        let svc = service(cvs, MockSectionRepository::new());
        let err = svc.create_cv(&owner(), "   ", None).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.message(), TITLE_REQUIRED);
    }

    #[tokio::test]
    async fn test_create_cv_unknown_template() {
        let mut cvs = MockCvRepository::new();
        cvs.expect_create().never();

        let svc = service(cvs, MockSectionRepository::new());
        let err = svc.create_cv(&owner(), "CV", Some("fancy")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_cv_limit_reached() {
        let mut cvs = MockCvRepository::new();
        cvs.expect_create()
            .withf(|_, max_active| *max_active == 10)
            .times(1)
            .returning(|_, _| Ok(None));

        let svc = service(cvs, MockSectionRepository::new());
        let err = svc.create_cv(&owner(), "Eleventh", None).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.message(), "You have reached the maximum limit of 10 CVs.");
    }

    #[tokio::test]
    async fn test_get_owned_rules() {
        let cv_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();

        let mut cvs = MockCvRepository::new();
        cvs.expect_find_by_id()
            .returning(move |id| Ok(Some(create_test_cv(id, owner_id))));

        let svc = service(cvs, MockSectionRepository::new());

        assert!(svc.get_owned(cv_id, owner_id).await.is_ok());
        let err = svc.get_owned(cv_id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_soft_deleted_cv_is_not_found() {
        let owner_id = Uuid::new_v4();

        let mut cvs = MockCvRepository::new();
        cvs.expect_find_by_id().returning(move |id| {
            let mut cv = create_test_cv(id, owner_id);
            cv.is_deleted = true;
            cv.deleted_at = Some(Utc::now());
            Ok(Some(cv))
        });

        let svc = service(cvs, MockSectionRepository::new());

        let err = svc.get_owned(Uuid::new_v4(), owner_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        let err = svc.get_active(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_cv_requires_owner() {
        let owner_id = Uuid::new_v4();

        let mut cvs = MockCvRepository::new();
        cvs.expect_find_by_id()
            .returning(move |id| Ok(Some(create_test_cv(id, owner_id))));
        cvs.expect_soft_delete().times(1).returning(|_| Ok(true));

        let svc = service(cvs, MockSectionRepository::new());

        let err = svc.delete_cv(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
        assert!(svc.delete_cv(Uuid::new_v4(), owner_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_meta_validates_catalog() {
        let owner_id = Uuid::new_v4();

        let mut cvs = MockCvRepository::new();
        cvs.expect_find_by_id()
            .returning(move |id| Ok(Some(create_test_cv(id, owner_id))));
        cvs.expect_update_meta().never();

        let svc = service(cvs, MockSectionRepository::new());

        let patch = CvPatch {
            template_slug: Some("unknown".to_string()),
            ..CvPatch::default()
        };
        assert!(svc.update_meta(Uuid::new_v4(), owner_id, patch).await.is_err());

        let patch = CvPatch {
            font_pair: Some("comic_sans".to_string()),
            ..CvPatch::default()
        };
        assert!(svc.update_meta(Uuid::new_v4(), owner_id, patch).await.is_err());
    }

    #[tokio::test]
    async fn test_update_meta_returns_detail() {
        let owner_id = Uuid::new_v4();

        let mut cvs = MockCvRepository::new();
        cvs.expect_find_by_id()
            .returning(move |id| Ok(Some(create_test_cv(id, owner_id))));
        cvs.expect_update_meta()
            .withf(|_, patch| patch.primary_color.as_deref() == Some("#112233"))
            .times(1)
            .returning(move |id, patch| {
                let mut cv = create_test_cv(id, owner_id);
                cv.primary_color = patch.primary_color;
                Ok(cv)
            });

        let mut sections = MockSectionRepository::new();
        sections.expect_list_for_cv().times(1).returning(|cv_id| {
            Ok(vec![CvSection {
                id: Uuid::new_v4(),
                cv_id,
                section_type: "personal".to_string(),
                label: None,
                content: json!({}),
                display_order: 0,
                is_visible: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }])
        });

        let svc = service(cvs, sections);
        let patch = CvPatch {
            primary_color: Some("#112233".to_string()),
            ..CvPatch::default()
        };
        let detail = svc.update_meta(Uuid::new_v4(), owner_id, patch).await.unwrap();

        assert_eq!(detail.cv.primary_color.as_deref(), Some("#112233"));
        assert_eq!(detail.sections.len(), 1);
    }
}
