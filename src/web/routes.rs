//! Browser-facing route groups.
//!
//! Each group is returned unthrottled so [`crate::routes::app_router`] can
//! attach its own rate limit; [`routes`] merges them for tests.

use crate::state::AppState;
use crate::web::handlers::{
    create_cv, dashboard, download, edit_cv, google_disabled, landing, login_page, login_submit,
    logout, preview, register_page, register_submit, robots, sitemap,
};
use axum::{
    Router,
    routing::{get, post},
};

/// # Endpoints
///
/// - `GET  /`                - Landing page
/// - `GET  /sitemap.xml`     - Sitemap
/// - `GET  /robots.txt`      - Crawler rules
/// - `GET  /cv/dashboard`    - CV list
/// - `POST /cv/new`          - Create a CV
/// - `GET  /cv/{id}/edit`    - Editor
/// - `GET  /auth/login`      - Login form
/// - `GET  /auth/register`   - Registration form
/// - `GET  /auth/logout`     - End the session
/// - `GET  /auth/google`     - Redirects to the password login
/// - `GET  /auth/callback`   - Redirects to the password login
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .route("/cv/dashboard", get(dashboard))
        .route("/cv/new", post(create_cv))
        .route("/cv/{id}/edit", get(edit_cv))
        .route("/auth/login", get(login_page))
        .route("/auth/register", get(register_page))
        .route("/auth/logout", get(logout))
        .route("/auth/google", get(google_disabled))
        .route("/auth/callback", get(google_disabled))
}

/// `POST /auth/login` and `POST /auth/register`.
pub fn auth_form_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login_submit))
        .route("/auth/register", post(register_submit))
}

/// `GET /cv/{id}/preview`
pub fn preview_routes() -> Router<AppState> {
    Router::new().route("/cv/{id}/preview", get(preview))
}

/// `GET /cv/{id}/download`
pub fn download_routes() -> Router<AppState> {
    Router::new().route("/cv/{id}/download", get(download))
}

/// All page routes without rate limits.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .merge(auth_form_routes())
        .merge(preview_routes())
        .merge(download_routes())
}
