//! JSON API route configuration.
//!
//! Reads are public; writes authenticate through the session cookie via
//! [`crate::web::extractors::ApiUser`] and answer 401 JSON when it is missing.

use crate::api::handlers::{
    ats_score_handler, create_section_handler, delete_cv_handler, delete_section_handler,
    list_sections_handler, update_meta_handler, update_section_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// # Endpoints
///
/// - `GET    /cv/api/{id}/sections`              - List sections (public)
/// - `POST   /cv/api/{id}/sections`              - Add a section
/// - `PUT    /cv/api/{id}/sections/{section_id}` - Partially update a section
/// - `DELETE /cv/api/{id}/sections/{section_id}` - Remove a section
/// - `PUT    /cv/api/{id}/meta`                  - Update title, template and styling
/// - `GET    /cv/api/{id}/ats-score`             - ATS compatibility report
/// - `POST   /cv/{id}/delete`                    - Soft-delete a CV
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cv/api/{id}/sections",
            get(list_sections_handler).post(create_section_handler),
        )
        .route(
            "/cv/api/{id}/sections/{section_id}",
            put(update_section_handler).delete(delete_section_handler),
        )
        .route("/cv/api/{id}/meta", put(update_meta_handler))
        .route("/cv/api/{id}/ats-score", get(ats_score_handler))
        .route("/cv/{id}/delete", post(delete_cv_handler))
}
