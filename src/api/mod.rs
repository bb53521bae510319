//! JSON API consumed by the CV editor.
//!
//! # Modules
//!
//! - [`dto`] - request/response bodies
//! - [`error`] - editor-facing error bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - rate limiting and request tracing
//! - [`routes`] - route configuration

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
