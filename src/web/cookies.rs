//! Minimal cookie reading and `Set-Cookie` building.
//!
//! All cookies are `HttpOnly; SameSite=Lax; Path=/`. `Secure` is added for the
//! session cookie in production.

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

pub const SESSION_COOKIE: &str = "cv_session";
pub const FLASH_COOKIE: &str = "cv_flash";

/// Returns the value of cookie `name` from the `Cookie` header(s).
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name && !value.is_empty() => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
}

/// `Set-Cookie` value. `max_age` of `None` makes a browser-session cookie.
///
/// `value` must already be cookie-safe (alphanumeric or percent-encoded).
pub fn set_cookie(name: &str, value: &str, max_age_seconds: Option<i64>, secure: bool) -> HeaderValue {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(max_age) = max_age_seconds {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    header_value(cookie)
}

/// `Set-Cookie` value that expires cookie `name` immediately.
pub fn clear_cookie(name: &str, secure: bool) -> HeaderValue {
    set_cookie(name, "", Some(0), secure)
}

/// True if the response already sets cookie `name`.
pub fn sets_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.strip_prefix(name).is_some_and(|rest| rest.starts_with('=')))
}

fn header_value(cookie: String) -> HeaderValue {
    HeaderValue::try_from(cookie).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Refusing to emit malformed cookie");
        HeaderValue::from_static("invalid=; Max-Age=0")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::SET_COOKIE;

    #[test]
    fn test_read_cookie_among_many() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; cv_session=abc123; cv_flash=info%3Dhi"),
        );

        assert_eq!(read_cookie(&headers, SESSION_COOKIE).as_deref(), Some("abc123"));
        assert_eq!(read_cookie(&headers, FLASH_COOKIE).as_deref(), Some("info%3Dhi"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_set_cookie_attributes() {
        let cookie = set_cookie(SESSION_COOKIE, "tok", Some(60), true);
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("cv_session=tok; Path=/; HttpOnly; SameSite=Lax"));
        assert!(cookie.contains("Max-Age=60"));
        assert!(cookie.ends_with("; Secure"));

        let cleared = clear_cookie(FLASH_COOKIE, false);
        assert_eq!(
            cleared.to_str().unwrap(),
            "cv_flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }

    #[test]
    fn test_sets_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, set_cookie(FLASH_COOKIE, "x", None, false));
        assert!(sets_cookie(&headers, FLASH_COOKIE));
        assert!(!sets_cookie(&headers, SESSION_COOKIE));
        assert!(!sets_cookie(&headers, "cv_flas"));
    }
}
