//! Repository trait for login sessions.

use crate::domain::entities::{NewSession, Session, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Sessions are looked up by the HMAC of the cookie token, never the token itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, new_session: NewSession) -> Result<Session, AppError>;

    /// Resolves a live session to its user.
    ///
    /// Returns `None` if the hash is unknown, the session has expired, or the
    /// user is deactivated.
    async fn find_active_user(&self, token_hash: &str) -> Result<Option<User>, AppError>;

    async fn touch(&self, token_hash: &str) -> Result<(), AppError>;

    async fn delete(&self, token_hash: &str) -> Result<(), AppError>;

    /// Deletes expired sessions and returns how many were removed.
    async fn purge_expired(&self) -> Result<u64, AppError>;
}
