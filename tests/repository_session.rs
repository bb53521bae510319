mod common;

use chrono::{Duration, Utc};
use cv_builder::domain::entities::NewSession;
use cv_builder::domain::repositories::SessionRepository;
use cv_builder::infrastructure::persistence::PgSessionRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_session_resolves_user(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let user = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    repo.create(NewSession {
        user_id: user.id,
        token_hash: "a".repeat(64),
        expires_at: Utc::now() + Duration::days(1),
    })
    .await
    .unwrap();

    let found = repo.find_active_user(&"a".repeat(64)).await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    repo.touch(&"a".repeat(64)).await.unwrap();
    repo.delete(&"a".repeat(64)).await.unwrap();

    assert!(repo.find_active_user(&"a".repeat(64)).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_expired_session_is_ignored_and_purged(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let user = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    repo.create(NewSession {
        user_id: user.id,
        token_hash: "b".repeat(64),
        expires_at: Utc::now() - Duration::minutes(1),
    })
    .await
    .unwrap();

    assert!(repo.find_active_user(&"b".repeat(64)).await.unwrap().is_none());
    assert_eq!(repo.purge_expired().await.unwrap(), 1);
}

#[sqlx::test]
async fn test_deactivated_user_session_is_ignored(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let user = common::create_test_user(&state, "Ada", "ada@example.com").await;
    common::deactivate_user(&pool, user.id).await;
    let repo = PgSessionRepository::new(Arc::new(pool));

    repo.create(NewSession {
        user_id: user.id,
        token_hash: "c".repeat(64),
        expires_at: Utc::now() + Duration::days(1),
    })
    .await
    .unwrap();

    assert!(repo.find_active_user(&"c".repeat(64)).await.unwrap().is_none());
}
