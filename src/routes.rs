//! Top-level router combining pages, the JSON API and static assets.
//!
//! # Route Structure
//!
//! - `/`, `/cv/*`, `/auth/*` - HTML pages (cookie session)
//! - `/cv/api/*`            - JSON API for the editor
//! - `GET /health`          - Health check: DB and cache (public)
//! - `/static/*`            - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Session** - Resolves the session cookie to the current user
//! - **Flash** - Clears flash messages once displayed
//! - **Rate limiting** - Per-IP token buckets per route group
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, Quota};
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web;
use crate::web::handlers::not_found;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let pages = web::routes::page_routes()
        .merge(api::routes::routes())
        .layer(rate_limit::layer(Quota::Default, behind_proxy));

    let auth_forms =
        web::routes::auth_form_routes().layer(rate_limit::layer(Quota::Auth, behind_proxy));

    let previews =
        web::routes::preview_routes().layer(rate_limit::layer(Quota::Preview, behind_proxy));

    let downloads =
        web::routes::download_routes().layer(rate_limit::layer(Quota::Download, behind_proxy));

    let router = Router::new()
        .merge(pages)
        .merge(auth_forms)
        .merge(previews)
        .merge(downloads)
        .route("/health", get(health_handler))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .layer(middleware::from_fn(web::middleware::flash::clear_consumed))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            web::middleware::session::layer,
        ))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
