//! Server-rendered HTML pages.
//!
//! Pages use Askama templates from `templates/`. The session cookie is
//! resolved once per request by [`middleware::session`]; one-shot messages
//! travel in a flash cookie ([`flash`]).

pub mod cookies;
pub mod extractors;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod routes;
