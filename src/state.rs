//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AuthService, CvService, ExportService, SectionService};
use crate::config::Config;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::pdf::PdfRenderer;
use crate::infrastructure::persistence::{
    PgCvRepository, PgDownloadLogRepository, PgSectionRepository, PgSessionRepository,
    PgUserRepository,
};

pub type PgAuthService = AuthService<PgUserRepository, PgSessionRepository>;
pub type PgCvService = CvService<PgCvRepository, PgSectionRepository>;
pub type PgSectionService = SectionService<PgCvRepository, PgSectionRepository>;
pub type PgExportService = ExportService<PgCvRepository, PgSectionRepository, PgDownloadLogRepository>;

/// The subset of [`Config`] the HTTP layer needs at runtime.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub base_url: String,
    pub secure_cookies: bool,
    pub behind_proxy: bool,
    pub secret_key: String,
    pub ip_hash_salt: String,
    pub max_cvs_per_user: i64,
    pub cache_ttl_seconds: u64,
}

impl AppSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            secure_cookies: config.secure_cookies(),
            behind_proxy: config.behind_proxy,
            secret_key: config.secret_key.clone(),
            ip_hash_salt: config.ip_hash_salt.clone(),
            max_cvs_per_user: config.max_cvs_per_user,
            cache_ttl_seconds: config.cache_ttl_seconds,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub cache: Arc<dyn CacheService>,
    pub auth_service: Arc<PgAuthService>,
    pub cv_service: Arc<PgCvService>,
    pub section_service: Arc<PgSectionService>,
    pub export_service: Arc<PgExportService>,
    pub base_url: String,
    pub secure_cookies: bool,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires PostgreSQL repositories into the services.
    pub fn new(
        pool: Arc<PgPool>,
        cache: Arc<dyn CacheService>,
        renderer: Arc<dyn PdfRenderer>,
        settings: AppSettings,
    ) -> Self {
        let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
        let session_repository = Arc::new(PgSessionRepository::new(pool.clone()));
        let cv_repository = Arc::new(PgCvRepository::new(pool.clone()));
        let section_repository = Arc::new(PgSectionRepository::new(pool.clone()));
        let download_log_repository = Arc::new(PgDownloadLogRepository::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            user_repository,
            session_repository,
            settings.secret_key,
        ));
        let cv_service = Arc::new(CvService::new(
            cv_repository.clone(),
            section_repository.clone(),
            settings.max_cvs_per_user,
        ));
        let section_service = Arc::new(SectionService::new(
            cv_repository.clone(),
            section_repository.clone(),
        ));
        let export_service = Arc::new(ExportService::new(
            cv_repository,
            section_repository,
            download_log_repository,
            cache.clone(),
            renderer,
            settings.cache_ttl_seconds,
            settings.ip_hash_salt,
        ));

        Self {
            db: pool,
            cache,
            auth_service,
            cv_service,
            section_service,
            export_service,
            base_url: settings.base_url,
            secure_cookies: settings.secure_cookies,
            behind_proxy: settings.behind_proxy,
        }
    }
}
