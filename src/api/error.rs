//! Error responses for the editor's JSON API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::application::services::section_service::INVALID_SECTION;
use crate::error::AppError;

/// Wraps [`AppError`] with the flat bodies the editor script expects.
///
/// - Forbidden → `403 {"error": "Unauthorized"}`
/// - Section/CV mismatch → `400 {"error": "Invalid section"}`
/// - Anything else → the standard [`AppError`] response
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            AppError::Forbidden { .. } => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": "Unauthorized" }))).into_response()
            }
            AppError::Validation { message, .. } if message == INVALID_SECTION => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": INVALID_SECTION }))).into_response()
            }
            _ => self.0.into_response(),
        }
    }
}
