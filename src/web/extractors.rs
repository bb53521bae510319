//! Request extractors for the logged-in user and client address.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::flash::Flash;

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";

/// Request extension set by [`crate::web::middleware::session::layer`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn current_user(parts: &Parts) -> Option<User> {
    parts.extensions.get::<CurrentUser>().map(|c| c.0.clone())
}

/// The logged-in user, if any.
pub struct MaybeUser(pub Option<User>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts)))
    }
}

/// The logged-in user for HTML pages. Guests are redirected to the login
/// page with `next` pointing back at the requested path.
pub struct RequireUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts) {
            Some(user) => Ok(Self(user)),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                let target = format!(
                    "/auth/login?{}",
                    url::form_urlencoded::Serializer::new(String::new())
                        .append_pair("next", next)
                        .finish()
                );
                Err((Flash::new().info(LOGIN_REQUIRED), Redirect::to(&target)).into_response())
            }
        }
    }
}

/// The logged-in user for JSON endpoints. Guests get `401` JSON.
pub struct ApiUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for ApiUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts).map(Self).ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Login required" }),
            )
        })
    }
}

/// Client IP address as a string, `"unknown"` when it cannot be determined.
///
/// Forwarding headers are only consulted when [`AppState::behind_proxy`] is set.
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let forwarded = state
            .behind_proxy
            .then(|| forwarded_ip(parts))
            .flatten();

        let ip = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self(ip))
    }
}

fn forwarded_ip(parts: &Parts) -> Option<String> {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .and_then(|list| list.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| header("x-real-ip").map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
}

/// Accepts only local paths for post-login redirects.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/cv/dashboard")), Some("/cv/dashboard"));
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(None), None);
    }

    #[test]
    fn test_forwarded_ip() {
        let (parts, _) = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(forwarded_ip(&parts).as_deref(), Some("203.0.113.9"));

        let (parts, _) = Request::builder()
            .header("x-real-ip", "198.51.100.4")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(forwarded_ip(&parts).as_deref(), Some("198.51.100.4"));

        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(forwarded_ip(&parts), None);
    }
}
