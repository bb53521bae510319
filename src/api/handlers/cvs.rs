//! JSON endpoints for CV metadata, deletion and ATS scoring.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::meta::{MetaResponse, UpdateMetaRequest};
use crate::api::dto::sections::SuccessResponse;
use crate::api::error::ApiError;
use crate::domain::ats::AtsReport;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::extractors::ApiUser;

/// Updates title, template, color or font pair.
///
/// # Endpoint
///
/// `PUT /cv/api/{id}/meta`
///
/// # Response
///
/// `{"success": true, "cv": {...}}` where `cv` carries its ordered `sections`.
pub async fn update_meta_handler(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(cv_id): Path<Uuid>,
    Json(payload): Json<UpdateMetaRequest>,
) -> Result<Json<MetaResponse>, ApiError> {
    payload.validate()?;

    let cv = state
        .cv_service
        .update_meta(cv_id, user.id, payload.into())
        .await?;

    state.export_service.invalidate_preview(cv_id).await;

    Ok(Json(MetaResponse { success: true, cv }))
}

/// Soft-deletes a CV.
///
/// # Endpoint
///
/// `POST /cv/{id}/delete`
///
/// # Response Codes
///
/// - **200** `{"success": true}`
/// - **403** `{"success": false, "error": "Unauthorized"}` for another user's CV
/// - **404** for missing or already deleted CVs
pub async fn delete_cv_handler(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(cv_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    match state.cv_service.delete_cv(cv_id, user.id).await {
        Ok(()) => {
            state.export_service.invalidate_preview(cv_id).await;
            Ok(Json(SuccessResponse { success: true }).into_response())
        }
        Err(AppError::Forbidden { .. }) => Ok((
            StatusCode::FORBIDDEN,
            Json(json!({ "success": false, "error": "Unauthorized" })),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Scores an owned CV for ATS compatibility.
///
/// # Endpoint
///
/// `GET /cv/api/{id}/ats-score`
///
/// # Response
///
/// ```json
/// {
///   "score": 78,
///   "breakdown": {
///     "sections": { "score": 35, "max": 40 },
///     "content":  { "score": 15, "max": 25 },
///     "dates":    { "score": 8,  "max": 15 },
///     "template": { "score": 20, "max": 20 }
///   },
///   "suggestions": ["Add a professional summary ..."]
/// }
/// ```
pub async fn ats_score_handler(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(cv_id): Path<Uuid>,
) -> Result<Json<AtsReport>, ApiError> {
    let report = state.cv_service.ats_report(cv_id, user.id).await?;
    Ok(Json(report))
}
