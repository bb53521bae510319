mod common;

use cv_builder::domain::entities::NewUser;
use cv_builder::domain::repositories::UserRepository;
use cv_builder::error::AppError;
use cv_builder::infrastructure::persistence::PgUserRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        display_name: Some("Test User".to_string()),
        password_hash: Some("$argon2id$v=19$placeholder".to_string()),
        google_id: None,
        photo_url: None,
    }
}

#[sqlx::test]
async fn test_create_and_find_user(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo.create(new_user("ada@example.com")).await.unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert!(user.is_active);
    assert!(user.last_login.is_none());

    let by_email = repo.find_by_email("ada@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));

    let by_id = repo.find_by_id(user.id).await.unwrap();
    assert!(by_id.is_some());
}

#[sqlx::test]
async fn test_find_unknown_email(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let result = repo.find_by_email("nobody@example.com").await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test]
async fn test_duplicate_email_conflicts(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    repo.create(new_user("dup@example.com")).await.unwrap();
    let result = repo.create(new_user("dup@example.com")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_set_active_and_last_login(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    let user = repo.create(new_user("flip@example.com")).await.unwrap();

    assert!(repo.set_active("flip@example.com", false).await.unwrap());
    assert!(!repo.set_active("missing@example.com", false).await.unwrap());

    repo.update_last_login(user.id).await.unwrap();

    let reloaded = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);
    assert!(reloaded.last_login.is_some());
}

#[sqlx::test]
async fn test_list_users(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create(new_user("one@example.com")).await.unwrap();
    repo.create(new_user("two@example.com")).await.unwrap();

    let users = repo.list().await.unwrap();
    assert_eq!(users.len(), 2);
}
