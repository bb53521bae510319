//! PostgreSQL implementation of the download log repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{DownloadLog, NewDownloadLog};
use crate::domain::repositories::DownloadLogRepository;
use crate::error::AppError;

pub struct PgDownloadLogRepository {
    pool: Arc<PgPool>,
}

impl PgDownloadLogRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DownloadLogRepository for PgDownloadLogRepository {
    async fn record(&self, entry: NewDownloadLog) -> Result<DownloadLog, AppError> {
        let log = sqlx::query_as::<_, DownloadLog>(
            r#"
            INSERT INTO download_logs (cv_id, user_id, ip_hash, cv_title)
            VALUES ($1, $2, $3, $4)
            RETURNING id, cv_id, user_id, ip_hash, cv_title, downloaded_at
            "#,
        )
        .bind(entry.cv_id)
        .bind(entry.user_id)
        .bind(&entry.ip_hash)
        .bind(&entry.cv_title)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(log)
    }

    async fn count_for_cv(&self, cv_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM download_logs WHERE cv_id = $1")
            .bind(cv_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM download_logs")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
