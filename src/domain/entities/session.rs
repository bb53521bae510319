//! Server-side login session.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Only the HMAC of the cookie token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let mut session = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "0".repeat(64),
            created_at: now,
            expires_at: now + Duration::days(7),
            last_used_at: now,
        };
        assert!(!session.is_expired());

        session.expires_at = now - Duration::seconds(1);
        assert!(session.is_expired());
    }
}
