//! Resolves the `cv_session` cookie to the logged-in user.

use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::web::cookies::{SESSION_COOKIE, clear_cookie, read_cookie, sets_cookie};
use crate::web::extractors::CurrentUser;

/// Inserts [`CurrentUser`] into request extensions for a live session.
///
/// Never rejects: pages decide for themselves whether a user is required
/// (see [`crate::web::extractors`]). An expired or revoked session cookie is
/// cleared on the way out unless the handler issued a new one.
pub async fn layer(State(st): State<AppState>, mut req: Request, next: Next) -> Response {
    let mut stale = false;

    if let Some(token) = read_cookie(req.headers(), SESSION_COOKIE) {
        match st.auth_service.authenticate(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(CurrentUser(user));
            }
            Err(AppError::Unauthorized { .. }) => stale = true,
            Err(e) => tracing::warn!(error = %e, "Session lookup failed"),
        }
    }

    let mut response = next.run(req).await;

    if stale && !sets_cookie(response.headers(), SESSION_COOKIE) {
        response
            .headers_mut()
            .append(SET_COOKIE, clear_cookie(SESSION_COOKIE, st.secure_cookies));
    }

    response
}
