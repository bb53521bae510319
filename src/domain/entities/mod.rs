//! Core records of the CV builder.
//!
//! Each entity maps one-to-one onto a table and derives `sqlx::FromRow`.
//! Creation inputs live next to them as `New*` structs, partial updates as
//! `*Patch` structs.

pub mod cv;
pub mod download_log;
pub mod section;
pub mod session;
pub mod user;

pub use cv::{Cv, CvDetail, CvPatch, NewCv};
pub use download_log::{DownloadLog, NewDownloadLog};
pub use section::{CvSection, NewSection, SectionPatch};
pub use session::{NewSession, Session};
pub use user::{NewUser, User};
