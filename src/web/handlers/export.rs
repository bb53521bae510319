//! HTML preview and PDF download.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::extractors::{ClientIp, RequireUser};
use crate::web::flash::Flash;
use crate::web::page::PageError;

pub const FOREIGN_DOWNLOAD: &str = "You can only download your own CVs.";
pub const PRINT_TIP: &str = "Tip: You can still use the preview and print to PDF from your browser!";

/// # Endpoint
///
/// `GET /cv/{id}/preview`
///
/// Public: anyone holding the id can view the rendered CV.
pub async fn preview(
    State(state): State<AppState>,
    Path(cv_id): Path<Uuid>,
) -> Result<Html<String>, PageError> {
    let html = state.export_service.preview_html(cv_id).await?;
    Ok(Html(html))
}

/// # Endpoint
///
/// `GET /cv/{id}/download`
///
/// Render failures flash a message and send the owner back to the editor.
pub async fn download(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ClientIp(ip): ClientIp,
    Path(cv_id): Path<Uuid>,
) -> Result<Response, PageError> {
    let editor = format!("/cv/{cv_id}/edit");

    match state.export_service.download_pdf(cv_id, user.id, &ip).await {
        Ok(pdf) => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
                (header::CONTENT_DISPOSITION, content_disposition(&pdf.filename)),
            ],
            pdf.bytes,
        )
            .into_response()),
        Err(AppError::Forbidden { .. }) => Err(PageError::forbidden(FOREIGN_DOWNLOAD)),
        Err(e @ AppError::Unavailable { .. }) => Ok((
            Flash::new().error(e.message()).info(PRINT_TIP),
            Redirect::to(&editor),
        )
            .into_response()),
        Err(e @ AppError::Internal { .. }) => Ok((
            Flash::new().error(e.message()),
            Redirect::to(&editor),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// `attachment` with an ASCII fallback name plus the RFC 5987 UTF-8 form.
fn content_disposition(filename: &str) -> HeaderValue {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    let encoded: String = url::form_urlencoded::byte_serialize(filename.as_bytes()).collect();

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"cv.pdf\""))
}
