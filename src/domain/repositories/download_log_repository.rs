//! Repository trait for the PDF download audit log.

use crate::domain::entities::{DownloadLog, NewDownloadLog};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Append-only: no update or delete operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DownloadLogRepository: Send + Sync {
    async fn record(&self, entry: NewDownloadLog) -> Result<DownloadLog, AppError>;

    async fn count_for_cv(&self, cv_id: Uuid) -> Result<i64, AppError>;

    async fn count_all(&self) -> Result<i64, AppError>;
}
