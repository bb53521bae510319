//! Renderer used when `PDF_RENDERER` is not set.

use super::service::{PdfError, PdfRenderer, PdfResult};
use async_trait::async_trait;

pub const UNAVAILABLE_MESSAGE: &str = "PDF generation is currently unavailable on this server.";

pub struct DisabledRenderer;

#[async_trait]
impl PdfRenderer for DisabledRenderer {
    async fn render(&self, _html: &str) -> PdfResult<Vec<u8>> {
        Err(PdfError::Unavailable(UNAVAILABLE_MESSAGE.to_string()))
    }

    fn is_available(&self) -> bool {
        false
    }
}
