//! Domain layer: entities, repository contracts and pure business rules.
//!
//! Nothing in here touches the network or the database directly.
//!
//! - [`entities`] - users, CVs, sections, sessions, download logs
//! - [`repositories`] - persistence traits implemented in infrastructure
//! - [`ats`] - ATS friendliness scoring
//! - [`content`] - section content checks
//! - [`templates`] - template and font-pair catalog

pub mod ats;
pub mod content;
pub mod entities;
pub mod repositories;
pub mod templates;
