//! HTML-to-PDF conversion.
//!
//! - [`CommandRenderer`] - pipes HTML through an external program
//! - [`DisabledRenderer`] - reports PDF export as unavailable

mod command_renderer;
mod disabled_renderer;
mod service;

pub use command_renderer::CommandRenderer;
pub use disabled_renderer::{DisabledRenderer, UNAVAILABLE_MESSAGE};
pub use service::{PdfError, PdfRenderer, PdfResult};

#[cfg(test)]
pub use service::MockPdfRenderer;
