//! Infrastructure layer: implementations of the domain's outward-facing needs.
//!
//! - [`cache`] - preview cache (Redis or no-op)
//! - [`pdf`] - external HTML-to-PDF renderer
//! - [`persistence`] - PostgreSQL repositories

pub mod cache;
pub mod pdf;
pub mod persistence;
