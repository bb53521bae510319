//! Expires the flash cookie once its messages have been displayed.

use axum::{
    extract::Request,
    http::header::SET_COOKIE,
    middleware::Next,
    response::Response,
};

use crate::web::cookies::{FLASH_COOKIE, clear_cookie, read_cookie, sets_cookie};

/// Clears `cv_flash` after any non-redirect response to a request that carried it.
///
/// Redirects keep the cookie so the messages survive until a page renders them;
/// responses that set a fresh flash are left alone.
pub async fn clear_consumed(req: Request, next: Next) -> Response {
    let had_flash = read_cookie(req.headers(), FLASH_COOKIE).is_some();

    let mut response = next.run(req).await;

    if had_flash
        && !response.status().is_redirection()
        && !sets_cookie(response.headers(), FLASH_COOKIE)
    {
        response
            .headers_mut()
            .append(SET_COOKIE, clear_cookie(FLASH_COOKIE, false));
    }

    response
}
