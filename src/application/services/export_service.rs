//! HTML preview and PDF download of CVs.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::document::render_document;
use crate::application::services::cv_service::ensure_owner;
use crate::domain::entities::{Cv, CvSection, NewDownloadLog};
use crate::domain::repositories::{CvRepository, DownloadLogRepository, SectionRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, preview_key};
use crate::infrastructure::pdf::{PdfError, PdfRenderer};
use serde_json::json;

pub const RENDER_FAILED: &str = "Failed to generate PDF. Please try again.";

/// A rendered PDF ready to be sent as an attachment.
#[derive(Debug)]
pub struct PdfDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Renders CVs to HTML (cached) and PDF (logged).
pub struct ExportService<C: CvRepository, S: SectionRepository, D: DownloadLogRepository> {
    cv_repository: Arc<C>,
    section_repository: Arc<S>,
    download_log_repository: Arc<D>,
    cache: Arc<dyn CacheService>,
    renderer: Arc<dyn PdfRenderer>,
    cache_ttl_seconds: u64,
    ip_hash_salt: String,
}

impl<C, S, D> ExportService<C, S, D>
where
    C: CvRepository,
    S: SectionRepository,
    D: DownloadLogRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cv_repository: Arc<C>,
        section_repository: Arc<S>,
        download_log_repository: Arc<D>,
        cache: Arc<dyn CacheService>,
        renderer: Arc<dyn PdfRenderer>,
        cache_ttl_seconds: u64,
        ip_hash_salt: String,
    ) -> Self {
        Self {
            cv_repository,
            section_repository,
            download_log_repository,
            cache,
            renderer,
            cache_ttl_seconds,
            ip_hash_salt,
        }
    }

    pub fn pdf_available(&self) -> bool {
        self.renderer.is_available()
    }

    async fn active_cv(&self, cv_id: Uuid) -> Result<Cv, AppError> {
        self.cv_repository
            .find_by_id(cv_id)
            .await?
            .filter(|cv| !cv.is_deleted)
            .ok_or_else(|| AppError::not_found("CV not found", json!({ "cv_id": cv_id })))
    }

    async fn load(&self, cv_id: Uuid) -> Result<(Cv, Vec<CvSection>), AppError> {
        let cv = self.active_cv(cv_id).await?;
        let sections = self.section_repository.list_for_cv(cv.id).await?;
        Ok((cv, sections))
    }

    /// Rendered HTML for a non-deleted CV, served from cache when possible.
    ///
    /// Entries are stamped with the CV's `updated_at`. Every edit bumps it, so a
    /// render stored after a concurrent edit's invalidation is never served.
    pub async fn preview_html(&self, cv_id: Uuid) -> Result<String, AppError> {
        let cv = self.active_cv(cv_id).await?;
        let key = preview_key(cv_id);
        let stamp = preview_stamp(&cv);

        if let Ok(Some(cached)) = self.cache.get(&key).await
            && let Some(html) = fresh_preview(&cached, &stamp)
        {
            metrics::counter!("cv_preview_cache_hits_total").increment(1);
            return Ok(html.to_string());
        }

        let sections = self.section_repository.list_for_cv(cv.id).await?;
        let html = render_document(&cv, &sections)?;

        if let Err(e) = self
            .cache
            .set(
                &key,
                &format!("{stamp}\n{html}"),
                Some(self.cache_ttl_seconds),
            )
            .await
        {
            tracing::warn!(cv_id = %cv_id, error = %e, "Failed to cache preview");
        }

        metrics::counter!("cv_preview_renders_total").increment(1);
        Ok(html)
    }

    /// Drops the cached preview after a CV or section change.
    pub async fn invalidate_preview(&self, cv_id: Uuid) {
        if let Err(e) = self.cache.invalidate(&preview_key(cv_id)).await {
            tracing::warn!(cv_id = %cv_id, error = %e, "Failed to invalidate preview cache");
        }
    }

    /// Renders a CV owned by `user_id` to PDF and appends a download log entry.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] / [`AppError::Forbidden`] for missing or foreign CVs
    /// - [`AppError::Unavailable`] when no renderer is configured or installed
    /// - [`AppError::Internal`] when the renderer fails or times out
    pub async fn download_pdf(
        &self,
        cv_id: Uuid,
        user_id: Uuid,
        client_ip: &str,
    ) -> Result<PdfDownload, AppError> {
        let (cv, sections) = self.load(cv_id).await?;
        ensure_owner(&cv, user_id)?;

        let html = render_document(&cv, &sections)?;

        let bytes = self.renderer.render(&html).await.map_err(|e| match e {
            PdfError::Unavailable(message) => {
                AppError::unavailable(message, json!({ "cv_id": cv_id }))
            }
            other => {
                tracing::error!(cv_id = %cv_id, error = %other, "PDF render failed");
                metrics::counter!("cv_pdf_failures_total").increment(1);
                AppError::internal(RENDER_FAILED, json!({ "cv_id": cv_id }))
            }
        })?;

        self.download_log_repository
            .record(NewDownloadLog {
                cv_id: cv.id,
                user_id,
                ip_hash: hash_ip(client_ip, &self.ip_hash_salt),
                cv_title: cv.title.clone(),
            })
            .await?;

        metrics::counter!("cv_pdf_downloads_total").increment(1);
        tracing::info!(cv_id = %cv.id, user_id = %user_id, bytes = bytes.len(), "PDF downloaded");

        Ok(PdfDownload {
            filename: pdf_filename(&cv, &sections),
            bytes,
        })
    }
}

fn preview_stamp(cv: &Cv) -> String {
    cv.updated_at.timestamp_micros().to_string()
}

/// The HTML of a cached entry, if it was rendered from the current version.
fn fresh_preview<'a>(cached: &'a str, stamp: &str) -> Option<&'a str> {
    cached
        .split_once('\n')
        .filter(|(cached_stamp, _)| *cached_stamp == stamp)
        .map(|(_, html)| html)
}

/// `hex(sha256(ip ++ salt))`
pub fn hash_ip(ip: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// `{name}_CV_{YYYY-MM}.pdf`, named after the person or, failing that, the CV title.
pub fn pdf_filename(cv: &Cv, sections: &[CvSection]) -> String {
    let name = sections
        .iter()
        .find(|s| s.section_type == "personal")
        .and_then(|s| s.text("name"))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(cv.title.trim());

    let safe: String = name
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '"' | '/' | '\\' | '\r' | '\n' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    format!("{safe}_CV_{}.pdf", Utc::now().format("%Y-%m"))
}
