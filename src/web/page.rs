//! Shared page context and HTML error pages.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::entities::User;
use crate::error::AppError;
use crate::web::flash::{FlashMessage, IncomingFlashes};

/// Data every page passes to `base.html`.
#[derive(Debug, Default, Clone)]
pub struct PageContext {
    pub user_name: Option<String>,
    pub flashes: Vec<FlashMessage>,
}

impl PageContext {
    pub fn new(user: Option<&User>, flashes: IncomingFlashes) -> Self {
        Self {
            user_name: user.map(|u| u.label().to_string()),
            flashes: flashes.0,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_name.is_some()
    }
}

/// Renders a template, falling back to a plain 500 if rendering fails.
pub fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "errors.html")]
struct ErrorTemplate<'a> {
    ctx: PageContext,
    code: u16,
    title: &'a str,
    message: &'a str,
}

/// An error shown to a browser as `errors.html`.
#[derive(Debug)]
pub struct PageError {
    pub status: StatusCode,
    pub message: String,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    fn title(&self) -> &'static str {
        match self.status {
            StatusCode::FORBIDDEN => "Access denied",
            StatusCode::NOT_FOUND => "Page not found",
            StatusCode::TOO_MANY_REQUESTS => "Too many requests",
            StatusCode::BAD_REQUEST => "Bad request",
            StatusCode::SERVICE_UNAVAILABLE => "Service unavailable",
            _ => "Something went wrong",
        }
    }
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        let status = err.status();
        let message = match &err {
            AppError::Forbidden { .. } => "You don't have permission to access this page.".to_string(),
            AppError::NotFound { .. } => "The page you're looking for doesn't exist.".to_string(),
            AppError::Internal { .. } => {
                tracing::error!(error = %err, "Page request failed");
                "An unexpected error occurred. Please try again later.".to_string()
            }
            other => other.message().to_string(),
        };
        Self { status, message }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let template = ErrorTemplate {
            ctx: PageContext::default(),
            code: self.status.as_u16(),
            title: self.title(),
            message: &self.message,
        };
        render(self.status, &template)
    }
}
