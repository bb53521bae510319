//! Web-specific middleware.
//!
//! - [`session`] - cookie session → [`crate::web::extractors::CurrentUser`]
//! - [`flash`] - clears displayed flash messages

pub mod flash;
pub mod session;
