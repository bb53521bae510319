//! One-shot notices carried across a redirect in the `cv_flash` cookie.
//!
//! The cookie holds `category=message` pairs, form-urlencoded. Handlers attach
//! a [`Flash`] to a redirect; the next page reads them with [`IncomingFlashes`]
//! and [`crate::web::middleware::flash::clear_consumed`] expires the cookie
//! once a non-redirect response has shown them.

use axum::extract::FromRequestParts;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use std::convert::Infallible;

use crate::web::cookies::{FLASH_COOKIE, read_cookie, set_cookie};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    /// `success`, `error`, `info` or `warning`; used as a CSS class.
    pub category: String,
    pub message: String,
}

/// Outgoing flash messages.
#[derive(Debug, Default, Clone)]
pub struct Flash {
    messages: Vec<FlashMessage>,
}

impl Flash {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, category: &str, message: impl Into<String>) -> Self {
        self.messages.push(FlashMessage {
            category: category.to_string(),
            message: message.into(),
        });
        self
    }

    pub fn success(self, message: impl Into<String>) -> Self {
        self.push("success", message)
    }

    pub fn error(self, message: impl Into<String>) -> Self {
        self.push("error", message)
    }

    pub fn info(self, message: impl Into<String>) -> Self {
        self.push("info", message)
    }

    pub fn warning(self, message: impl Into<String>) -> Self {
        self.push("warning", message)
    }

    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for m in &self.messages {
            serializer.append_pair(&m.category, &m.message);
        }
        serializer.finish()
    }
}

impl IntoResponseParts for Flash {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.messages.is_empty() {
            res.headers_mut()
                .append(SET_COOKIE, set_cookie(FLASH_COOKIE, &self.encode(), None, false));
        }
        Ok(res)
    }
}

pub fn decode(raw: &str) -> Vec<FlashMessage> {
    url::form_urlencoded::parse(raw.as_bytes())
        .filter(|(_, message)| !message.is_empty())
        .map(|(category, message)| FlashMessage {
            category: match category.as_ref() {
                "success" | "error" | "info" | "warning" => category.into_owned(),
                _ => "info".to_string(),
            },
            message: message.into_owned(),
        })
        .collect()
}

/// Flash messages set by the previous response.
#[derive(Debug, Default, Clone)]
pub struct IncomingFlashes(pub Vec<FlashMessage>);

impl<S: Send + Sync> FromRequestParts<S> for IncomingFlashes {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            read_cookie(&parts.headers, FLASH_COOKIE)
                .map(|raw| decode(&raw))
                .unwrap_or_default(),
        ))
    }
}
