//! HTML page handlers.

pub mod auth;
pub mod cv;
pub mod export;
pub mod site;

pub use auth::{google_disabled, login_page, login_submit, logout, register_page, register_submit};
pub use cv::{create_cv, dashboard, edit_cv};
pub use export::{download, preview};
pub use site::{landing, not_found, robots, sitemap};
