//! PostgreSQL implementation of the CV repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Cv, CvPatch, NewCv};
use crate::domain::repositories::CvRepository;
use crate::error::AppError;

const CV_COLUMNS: &str = "id, user_id, title, template_slug, primary_color, font_pair, \
                          is_deleted, deleted_at, created_at, updated_at";

pub struct PgCvRepository {
    pool: Arc<PgPool>,
}

impl PgCvRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CvRepository for PgCvRepository {
    async fn create(&self, new_cv: NewCv, max_active: i64) -> Result<Option<Cv>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Serializes creates per user until commit.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(new_cv.user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let active: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cvs WHERE user_id = $1 AND NOT is_deleted")
                .bind(new_cv.user_id)
                .fetch_one(&mut *tx)
                .await?;

        if active >= max_active {
            return Ok(None);
        }

        let sql = format!(
            "INSERT INTO cvs (user_id, title, template_slug, primary_color, font_pair) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CV_COLUMNS}"
        );

        let cv = sqlx::query_as::<_, Cv>(&sql)
            .bind(new_cv.user_id)
            .bind(&new_cv.title)
            .bind(&new_cv.template_slug)
            .bind(&new_cv.primary_color)
            .bind(&new_cv.font_pair)
            .fetch_one(&mut *tx)
            .await?;

        for section in &new_cv.sections {
            sqlx::query(
                r#"
                INSERT INTO cv_sections (cv_id, section_type, label, content, display_order)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(cv.id)
            .bind(&section.section_type)
            .bind(&section.label)
            .bind(&section.content)
            .bind(section.display_order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(cv))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Cv>, AppError> {
        let sql = format!("SELECT {CV_COLUMNS} FROM cvs WHERE id = $1");

        Ok(sqlx::query_as::<_, Cv>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?)
    }

    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<Cv>, AppError> {
        let sql = format!(
            "SELECT {CV_COLUMNS} FROM cvs \
             WHERE user_id = $1 AND NOT is_deleted \
             ORDER BY updated_at DESC"
        );

        Ok(sqlx::query_as::<_, Cv>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?)
    }

    async fn update_meta(&self, id: Uuid, patch: CvPatch) -> Result<Cv, AppError> {
        // COALESCE keeps the stored value for fields absent from the patch.
        let sql = format!(
            "UPDATE cvs SET \
                title = COALESCE($2, title), \
                template_slug = COALESCE($3, template_slug), \
                primary_color = COALESCE($4, primary_color), \
                font_pair = COALESCE($5, font_pair), \
                updated_at = NOW() \
             WHERE id = $1 AND NOT is_deleted \
             RETURNING {CV_COLUMNS}"
        );

        sqlx::query_as::<_, Cv>(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.template_slug)
            .bind(&patch.primary_color)
            .bind(&patch.font_pair)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("CV not found", json!({ "cv_id": id })))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE cvs
            SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn touch(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE cvs SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
