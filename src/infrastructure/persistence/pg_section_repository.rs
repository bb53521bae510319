//! PostgreSQL implementation of the section repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{CvSection, NewSection, SectionPatch};
use crate::domain::repositories::SectionRepository;
use crate::error::AppError;

const SECTION_COLUMNS: &str = "id, cv_id, section_type, label, content, display_order, \
                               is_visible, created_at, updated_at";

pub struct PgSectionRepository {
    pool: Arc<PgPool>,
}

impl PgSectionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SectionRepository for PgSectionRepository {
    async fn create(&self, cv_id: Uuid, new_section: NewSection) -> Result<CvSection, AppError> {
        let sql = format!(
            "INSERT INTO cv_sections (cv_id, section_type, label, content, display_order) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SECTION_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, CvSection>(&sql)
            .bind(cv_id)
            .bind(&new_section.section_type)
            .bind(&new_section.label)
            .bind(&new_section.content)
            .bind(new_section.display_order)
            .fetch_one(self.pool.as_ref())
            .await?)
    }

    async fn list_for_cv(&self, cv_id: Uuid) -> Result<Vec<CvSection>, AppError> {
        let sql = format!(
            "SELECT {SECTION_COLUMNS} FROM cv_sections \
             WHERE cv_id = $1 \
             ORDER BY display_order, created_at"
        );

        Ok(sqlx::query_as::<_, CvSection>(&sql)
            .bind(cv_id)
            .fetch_all(self.pool.as_ref())
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CvSection>, AppError> {
        let sql = format!("SELECT {SECTION_COLUMNS} FROM cv_sections WHERE id = $1");

        Ok(sqlx::query_as::<_, CvSection>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?)
    }

    async fn update(&self, id: Uuid, patch: SectionPatch) -> Result<CvSection, AppError> {
        // $4 flags whether the label was present in the patch, so NULL can clear it.
        let (label_set, label) = match patch.label {
            Some(label) => (true, label),
            None => (false, None),
        };

        let sql = format!(
            "UPDATE cv_sections SET \
                content = COALESCE($2, content), \
                label = CASE WHEN $4 THEN $3 ELSE label END, \
                is_visible = COALESCE($5, is_visible), \
                display_order = COALESCE($6, display_order), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SECTION_COLUMNS}"
        );

        sqlx::query_as::<_, CvSection>(&sql)
            .bind(id)
            .bind(&patch.content)
            .bind(&label)
            .bind(label_set)
            .bind(patch.is_visible)
            .bind(patch.display_order)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Section not found", json!({ "section_id": id })))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cv_sections WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
