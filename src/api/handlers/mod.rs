//! HTTP request handlers for the JSON API.

pub mod cvs;
pub mod health;
pub mod sections;

pub use cvs::{ats_score_handler, delete_cv_handler, update_meta_handler};
pub use health::health_handler;
pub use sections::{
    create_section_handler, delete_section_handler, list_sections_handler,
    update_section_handler,
};
