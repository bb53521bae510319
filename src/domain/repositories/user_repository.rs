//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Looks up by normalized (lowercase) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn update_last_login(&self, id: Uuid) -> Result<(), AppError>;

    /// Returns `false` when no user has this email.
    async fn set_active(&self, email: &str, active: bool) -> Result<bool, AppError>;

    /// All users, newest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;
}
