//! PDF renderer trait and error types.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    /// No renderer is configured or its binary cannot be started.
    #[error("{0}")]
    Unavailable(String),

    #[error("PDF renderer timed out after {0}s")]
    Timeout(u64),

    #[error("PDF renderer failed: {0}")]
    Failed(String),
}

pub type PdfResult<T> = Result<T, PdfError>;

/// Converts a standalone HTML document into PDF bytes.
///
/// - [`crate::infrastructure::pdf::CommandRenderer`] - external HTML-to-PDF program
/// - [`crate::infrastructure::pdf::DisabledRenderer`] - downloads turned off
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> PdfResult<Vec<u8>>;

    fn is_available(&self) -> bool;
}
