//! Landing page, crawler files and the 404 fallback.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::domain::templates::{CvTemplate, TEMPLATES};
use crate::state::AppState;
use crate::web::extractors::MaybeUser;
use crate::web::flash::IncomingFlashes;
use crate::web::page::{PageContext, PageError};

const SITEMAP_PATHS: &[(&str, &str, &str)] = &[
    ("/", "weekly", "1.0"),
    ("/cv/dashboard", "weekly", "0.8"),
    ("/auth/login", "monthly", "0.5"),
];

#[derive(Template, WebTemplate)]
#[template(path = "landing.html")]
struct LandingTemplate {
    ctx: PageContext,
    templates: &'static [CvTemplate],
}

pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

#[derive(Template)]
#[template(path = "sitemap.xml")]
struct SitemapTemplate {
    urls: Vec<SitemapUrl>,
}

/// # Endpoint
///
/// `GET /`
pub async fn landing(MaybeUser(user): MaybeUser, flashes: IncomingFlashes) -> impl IntoResponse {
    LandingTemplate {
        ctx: PageContext::new(user.as_ref(), flashes),
        templates: TEMPLATES,
    }
}

fn sitemap_urls(base_url: &str) -> Vec<SitemapUrl> {
    let base = base_url.trim_end_matches('/');
    let today = Utc::now().format("%Y-%m-%d").to_string();

    SITEMAP_PATHS
        .iter()
        .map(|&(path, changefreq, priority)| SitemapUrl {
            loc: format!("{base}{path}"),
            lastmod: today.clone(),
            changefreq,
            priority,
        })
        .collect()
}

/// # Endpoint
///
/// `GET /sitemap.xml`
pub async fn sitemap(State(state): State<AppState>) -> Result<Response, PageError> {
    let xml = SitemapTemplate {
        urls: sitemap_urls(&state.base_url),
    }
    .render()
    .map_err(|e| {
        tracing::error!(error = %e, "Sitemap rendering failed");
        PageError::new(StatusCode::INTERNAL_SERVER_ERROR, "Sitemap unavailable")
    })?;

    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response())
}

fn robots_body(base_url: &str) -> String {
    format!(
        "User-agent: *\n\
         Allow: /\n\
         Disallow: /cv/*/edit\n\
         Disallow: /cv/*/preview\n\
         Disallow: /cv/*/download\n\
         Disallow: /cv/api/\n\
         Disallow: /auth/\n\
         \n\
         Sitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

/// # Endpoint
///
/// `GET /robots.txt`
pub async fn robots(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_body(&state.base_url),
    )
        .into_response()
}

/// Fallback for unknown paths.
pub async fn not_found() -> PageError {
    PageError::new(StatusCode::NOT_FOUND, "The page you're looking for doesn't exist.")
}
