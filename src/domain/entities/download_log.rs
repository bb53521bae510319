//! Audit record written after every successful PDF export.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DownloadLog {
    pub id: Uuid,
    pub cv_id: Uuid,
    pub user_id: Uuid,
    pub ip_hash: String,
    pub cv_title: String,
    pub downloaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDownloadLog {
    pub cv_id: Uuid,
    pub user_id: Uuid,
    /// Salted SHA-256 of the client IP, never the raw address.
    pub ip_hash: String,
    /// Title at the time of download; later renames don't rewrite history.
    pub cv_title: String,
}
