//! Checks applied to section content before it is stored.
//!
//! Content is otherwise opaque: only URL-valued contact fields, long free-text
//! fields and the overall payload size are inspected, at any nesting depth.

use serde_json::{Value, json};

use crate::error::AppError;

pub const MAX_CONTENT_BYTES: usize = 64 * 1024;
pub const MAX_WORDS: usize = 500;

const URL_FIELDS: &[&str] = &["linkedin", "github", "portfolio", "website", "url"];
const LONG_TEXT_FIELDS: &[&str] = &["description", "summary", "text"];

/// Validates section content.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the offending field.
pub fn validate_content(content: &Value) -> Result<(), AppError> {
    let size = serde_json::to_vec(content)
        .map(|bytes| bytes.len())
        .unwrap_or(usize::MAX);
    if size > MAX_CONTENT_BYTES {
        return Err(AppError::bad_request(
            "Section content is too large",
            json!({ "max_bytes": MAX_CONTENT_BYTES, "bytes": size }),
        ));
    }

    check_value(content, None)
}

fn check_value(value: &Value, key: Option<&str>) -> Result<(), AppError> {
    match value {
        Value::Object(map) => map
            .iter()
            .try_for_each(|(k, v)| check_value(v, Some(k.as_str()))),
        Value::Array(items) => items.iter().try_for_each(|v| check_value(v, key)),
        Value::String(s) => match key {
            Some(k) if URL_FIELDS.contains(&k) => check_url(k, s),
            Some(k) if LONG_TEXT_FIELDS.contains(&k) => check_word_count(k, s),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

fn check_url(field: &str, raw: &str) -> Result<(), AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(());
    }

    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(AppError::bad_request(
            "URL must use one of: http, https",
            json!({ "field": field }),
        )),
    }
}

fn check_word_count(field: &str, text: &str) -> Result<(), AppError> {
    let words = text.split_whitespace().count();
    if words > MAX_WORDS {
        return Err(AppError::bad_request(
            format!("Maximum {MAX_WORDS} words allowed (you have {words})"),
            json!({ "field": field, "words": words }),
        ));
    }
    Ok(())
}
