//! Data Transfer Objects for the JSON API.
//!
//! Request DTOs derive `Deserialize` and `validator::Validate`; handlers call
//! `validate()` before touching a service.

pub mod health;
pub mod meta;
pub mod sections;
