//! HTTP middleware shared by the API and web routes.

pub mod rate_limit;
pub mod tracing;
