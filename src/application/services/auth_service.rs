//! Password accounts and cookie sessions.

use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::Argon2;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::user::normalize_email;
use crate::domain::entities::{NewSession, NewUser, User};
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_TOKEN_LENGTH: usize = 48;
pub const SESSION_DAYS: i64 = 7;
pub const REMEMBER_ME_DAYS: i64 = 30;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ACCOUNT_DEACTIVATED: &str = "Your account has been deactivated. Please contact support.";
pub const EMAIL_TAKEN: &str = "Email already registered. Please use a different email or login.";

/// A freshly created session. `token` is only ever held by the client.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub max_age: Duration,
}

/// Registers users, checks passwords and manages login sessions.
///
/// Session tokens are hashed with HMAC-SHA256 keyed by the server secret before
/// they reach the database, so a leaked `sessions` table cannot be replayed.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    users: Arc<U>,
    sessions: Arc<S>,
    secret_key: String,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(users: Arc<U>, sessions: Arc<S>, secret_key: String) -> Self {
        Self {
            users,
            sessions,
            secret_key,
        }
    }

    fn hash_token(&self, token: &str) -> String {
        hash_session_token(&self.secret_key, token)
    }

    /// Creates a password account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn register(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN, json!({ "field": "email" })));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))??;

        let user = self
            .users
            .create(NewUser {
                email,
                display_name: Some(display_name.trim().to_string()),
                password_hash: Some(password_hash),
                google_id: None,
                photo_url: None,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and records the login.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email, a wrong password or an
    /// account without a password, and [`AppError::Forbidden`] for a deactivated account.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        let Some(stored) = user.password_hash.clone() else {
            tracing::info!(user_id = %user.id, "Login attempt on account without password");
            return Err(invalid_credentials());
        };

        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .unwrap_or(false);

        if !verified {
            tracing::info!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid_credentials());
        }

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Login attempt on deactivated account");
            return Err(AppError::forbidden(ACCOUNT_DEACTIVATED, json!({})));
        }

        self.users.update_last_login(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Opens a session for the user and returns the raw token for the cookie.
    pub async fn start_session(
        &self,
        user_id: uuid::Uuid,
        remember: bool,
    ) -> Result<IssuedSession, AppError> {
        let max_age = Duration::days(if remember {
            REMEMBER_ME_DAYS
        } else {
            SESSION_DAYS
        });
        let token = generate_token();

        self.sessions
            .create(NewSession {
                user_id,
                token_hash: self.hash_token(&token),
                expires_at: Utc::now() + max_age,
            })
            .await?;

        Ok(IssuedSession { token, max_age })
    }

    /// Resolves a session cookie to its user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the session is unknown, expired, or its
    /// user has been deactivated.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let token_hash = self.hash_token(token);

        let user = self
            .sessions
            .find_active_user(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid or expired session" }))
            })?;

        // A failed activity bump must not sign the user out.
        if let Err(e) = self.sessions.touch(&token_hash).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to update session activity");
        }

        Ok(user)
    }

    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.sessions.delete(&self.hash_token(token)).await
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized(INVALID_CREDENTIALS, json!({}))
}

/// HMAC-SHA256 of a session token, hex encoded.
pub fn hash_session_token(secret_key: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Hashes a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))
}

/// Malformed stored hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Random alphanumeric session token.
pub fn generate_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();

    (0..SESSION_TOKEN_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
