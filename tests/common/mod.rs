#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware, routing::get};
use axum_test::TestServer;
use cv_builder::api;
use cv_builder::api::handlers::health_handler;
use cv_builder::domain::entities::{Cv, User};
use cv_builder::infrastructure::cache::{CacheResult, CacheService, NullCache};
use cv_builder::infrastructure::pdf::{DisabledRenderer, PdfRenderer, PdfResult};
use cv_builder::state::{AppSettings, AppState};
use cv_builder::web;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const PASSWORD: &str = "correct-horse-battery";
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% test document\n%%EOF\n";

/// Returns a fixed PDF for any input.
pub struct FakeRenderer;

#[async_trait]
impl PdfRenderer for FakeRenderer {
    async fn render(&self, _html: &str) -> PdfResult<Vec<u8>> {
        Ok(FAKE_PDF.to_vec())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// In-memory cache that remembers which keys were invalidated.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    invalidated: Mutex<Vec<String>>,
}

impl MemoryCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn invalidated(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }

    pub fn was_invalidated(&self, key: &str) -> bool {
        self.invalidated.lock().unwrap().iter().any(|k| k == key)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        self.invalidated.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub fn test_settings() -> AppSettings {
    AppSettings {
        base_url: "http://cv.test".to_string(),
        secure_cookies: false,
        behind_proxy: false,
        secret_key: "test-signing-secret".to_string(),
        ip_hash_salt: "test-salt".to_string(),
        max_cvs_per_user: 3,
        cache_ttl_seconds: 60,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    create_test_state_with_renderer(pool, Arc::new(FakeRenderer))
}

pub fn create_test_state_without_pdf(pool: PgPool) -> AppState {
    create_test_state_with_renderer(pool, Arc::new(DisabledRenderer))
}

pub fn create_test_state_with_renderer(pool: PgPool, renderer: Arc<dyn PdfRenderer>) -> AppState {
    AppState::new(
        Arc::new(pool),
        Arc::new(NullCache::new()),
        renderer,
        test_settings(),
    )
}

pub fn create_test_state_with_cache(pool: PgPool, cache: Arc<MemoryCache>) -> AppState {
    AppState::new(Arc::new(pool), cache, Arc::new(FakeRenderer), test_settings())
}

/// Full application without rate limits.
pub fn make_server(state: AppState) -> TestServer {
    let app = Router::new()
        .merge(web::routes::routes())
        .merge(api::routes::routes())
        .route("/health", get(health_handler))
        .fallback(web::handlers::not_found)
        .layer(middleware::from_fn(web::middleware::flash::clear_consumed))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            web::middleware::session::layer,
        ))
        .with_state(state);

    TestServer::new(app).unwrap()
}

pub async fn create_test_user(state: &AppState, name: &str, email: &str) -> User {
    state
        .auth_service
        .register(name, email, PASSWORD)
        .await
        .unwrap()
}

/// A `Cookie` header value carrying a fresh session for `user`.
pub async fn session_cookie(state: &AppState, user: &User) -> String {
    let session = state.auth_service.start_session(user.id, false).await.unwrap();
    format!("cv_session={}", session.token)
}

pub async fn create_test_cv(state: &AppState, user: &User, title: &str) -> Cv {
    state.cv_service.create_cv(user, title, None).await.unwrap()
}

pub async fn count_download_logs(pool: &PgPool, cv_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM download_logs WHERE cv_id = $1")
        .bind(cv_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn deactivate_user(pool: &PgPool, user_id: Uuid) {
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}
