//! Handlers for the section CRUD endpoints used by the editor.

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::sections::{
    CreateSectionRequest, SectionListResponse, SectionResponse, SuccessResponse,
    UpdateSectionRequest,
};
use crate::api::error::ApiError;
use crate::state::AppState;
use crate::web::extractors::ApiUser;

/// Lists a CV's sections in display order.
///
/// # Endpoint
///
/// `GET /cv/api/{id}/sections`
///
/// Public: the preview page is public, so its data is too. Soft-deleted CVs give 404.
pub async fn list_sections_handler(
    State(state): State<AppState>,
    Path(cv_id): Path<Uuid>,
) -> Result<Json<SectionListResponse>, ApiError> {
    let sections = state.section_service.list(cv_id).await?;
    Ok(Json(SectionListResponse { sections }))
}

/// Adds a section to an owned CV.
///
/// # Endpoint
///
/// `POST /cv/api/{id}/sections`
///
/// # Request Body
///
/// ```json
/// { "section_type": "experience", "label": "Work", "content": {}, "display_order": 2 }
/// ```
///
/// Only `section_type` is required; `content` defaults to `{}` and
/// `display_order` to 999 (end of the list).
pub async fn create_section_handler(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(cv_id): Path<Uuid>,
    Json(payload): Json<CreateSectionRequest>,
) -> Result<Json<SectionResponse>, ApiError> {
    payload.validate()?;

    let section = state
        .section_service
        .create(cv_id, user.id, payload.into())
        .await?;

    state.export_service.invalidate_preview(cv_id).await;

    Ok(Json(SectionResponse {
        success: true,
        section,
    }))
}

/// Partially updates a section.
///
/// # Endpoint
///
/// `PUT /cv/api/{id}/sections/{section_id}`
///
/// # Errors
///
/// - **400** `{"error": "Invalid section"}` if the section belongs to another CV
/// - **403** `{"error": "Unauthorized"}` if the CV belongs to another user
pub async fn update_section_handler(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path((cv_id, section_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateSectionRequest>,
) -> Result<Json<SectionResponse>, ApiError> {
    payload.validate()?;

    let section = state
        .section_service
        .update(cv_id, section_id, user.id, payload.into())
        .await?;

    state.export_service.invalidate_preview(cv_id).await;

    Ok(Json(SectionResponse {
        success: true,
        section,
    }))
}

/// # Endpoint
///
/// `DELETE /cv/api/{id}/sections/{section_id}`
pub async fn delete_section_handler(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path((cv_id, section_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .section_service
        .delete(cv_id, section_id, user.id)
        .await?;

    state.export_service.invalidate_preview(cv_id).await;

    Ok(Json(SuccessResponse { success: true }))
}
