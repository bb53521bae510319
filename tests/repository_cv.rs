mod common;

use cv_builder::domain::entities::{CvPatch, NewCv, NewDownloadLog, NewSection, SectionPatch};
use cv_builder::domain::repositories::{CvRepository, DownloadLogRepository, SectionRepository};
use cv_builder::infrastructure::persistence::{
    PgCvRepository, PgDownloadLogRepository, PgSectionRepository,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

async fn owner(pool: &PgPool) -> Uuid {
    let state = common::create_test_state(pool.clone());
    common::create_test_user(&state, "Ada", "ada@example.com").await.id
}

#[sqlx::test]
async fn test_create_cv_with_personal_section(pool: PgPool) {
    let user_id = owner(&pool).await;
    let pool = Arc::new(pool);
    let cvs = PgCvRepository::new(pool.clone());
    let sections = PgSectionRepository::new(pool);

    let cv = cvs
        .create(
            NewCv::with_defaults(
                user_id,
                "ada@example.com",
                "Backend".to_string(),
                "ats_modern".to_string(),
            ),
            10,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(cv.title, "Backend");
    assert_eq!(cv.template_slug, "ats_modern");
    assert_eq!(cv.primary_color.as_deref(), Some("#4285f4"));
    assert!(!cv.is_deleted);

    let list = sections.list_for_cv(cv.id).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].section_type, "personal");
    assert_eq!(list[0].content["email"], "ada@example.com");
}

#[sqlx::test]
async fn test_soft_delete_hides_cv(pool: PgPool) {
    let user_id = owner(&pool).await;
    let cvs = PgCvRepository::new(Arc::new(pool));

    let cv = cvs
        .create(NewCv::with_defaults(user_id, "ada@example.com", "One".to_string(), "ats_clean".to_string()), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cvs.list_active_for_user(user_id).await.unwrap().len(), 1);

    assert!(cvs.soft_delete(cv.id).await.unwrap());
    assert!(!cvs.soft_delete(cv.id).await.unwrap());

    assert!(cvs.list_active_for_user(user_id).await.unwrap().is_empty());

    let stored = cvs.find_by_id(cv.id).await.unwrap().unwrap();
    assert!(stored.is_deleted);
    assert!(stored.deleted_at.is_some());
}

#[sqlx::test]
async fn test_update_meta_keeps_unset_fields(pool: PgPool) {
    let user_id = owner(&pool).await;
    let cvs = PgCvRepository::new(Arc::new(pool));
    let cv = cvs
        .create(NewCv::with_defaults(user_id, "ada@example.com", "One".to_string(), "ats_clean".to_string()), 10)
        .await
        .unwrap()
        .unwrap();

    let updated = cvs
        .update_meta(
            cv.id,
            CvPatch {
                font_pair: Some("lato_playfair".to_string()),
                ..CvPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "One");
    assert_eq!(updated.template_slug, "ats_clean");
    assert_eq!(updated.font_pair.as_deref(), Some("lato_playfair"));
    assert!(updated.updated_at >= cv.updated_at);
}

#[sqlx::test]
async fn test_sections_are_ordered_and_patchable(pool: PgPool) {
    let user_id = owner(&pool).await;
    let pool = Arc::new(pool);
    let cvs = PgCvRepository::new(pool.clone());
    let sections = PgSectionRepository::new(pool);
    let cv = cvs
        .create(NewCv::with_defaults(user_id, "ada@example.com", "One".to_string(), "ats_clean".to_string()), 10)
        .await
        .unwrap()
        .unwrap();

    let skills = sections
        .create(
            cv.id,
            NewSection {
                section_type: "skills".to_string(),
                label: Some("Skills".to_string()),
                content: json!({ "technical": "Rust" }),
                display_order: 999,
            },
        )
        .await
        .unwrap();
    sections
        .create(
            cv.id,
            NewSection {
                section_type: "summary".to_string(),
                label: None,
                content: json!({ "text": "Hi" }),
                display_order: 1,
            },
        )
        .await
        .unwrap();

    let kinds: Vec<String> = sections
        .list_for_cv(cv.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.section_type)
        .collect();
    assert_eq!(kinds, vec!["personal", "summary", "skills"]);

    let patched = sections
        .update(
            skills.id,
            SectionPatch {
                label: Some(None),
                is_visible: Some(false),
                ..SectionPatch::default()
            },
        )
        .await
        .unwrap();
    assert!(patched.label.is_none());
    assert!(!patched.is_visible);
    assert_eq!(patched.content, json!({ "technical": "Rust" }));

    assert!(sections.delete(skills.id).await.unwrap());
    assert!(sections.find_by_id(skills.id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_download_log_is_append_only(pool: PgPool) {
    let user_id = owner(&pool).await;
    let shared = Arc::new(pool.clone());
    let cvs = PgCvRepository::new(shared.clone());
    let logs = PgDownloadLogRepository::new(shared);
    let cv = cvs
        .create(NewCv::with_defaults(user_id, "ada@example.com", "One".to_string(), "ats_clean".to_string()), 10)
        .await
        .unwrap()
        .unwrap();

    let entry = logs
        .record(NewDownloadLog {
            cv_id: cv.id,
            user_id,
            ip_hash: "f".repeat(64),
            cv_title: cv.title.clone(),
        })
        .await
        .unwrap();
    assert_eq!(entry.cv_title, "One");
    assert_eq!(logs.count_for_cv(cv.id).await.unwrap(), 1);
    assert_eq!(logs.count_all().await.unwrap(), 1);

    let update = sqlx::query("UPDATE download_logs SET cv_title = 'changed' WHERE id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await;
    assert!(update.is_err());

    let delete = sqlx::query("DELETE FROM download_logs WHERE id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await;
    assert!(delete.is_err());
    assert_eq!(logs.count_for_cv(cv.id).await.unwrap(), 1);
}

#[sqlx::test]
async fn test_hard_delete_keeps_download_history(pool: PgPool) {
    let user_id = owner(&pool).await;
    let shared = Arc::new(pool.clone());
    let cvs = PgCvRepository::new(shared.clone());
    let logs = PgDownloadLogRepository::new(shared);
    let downloaded = cvs
        .create(NewCv::with_defaults(user_id, "ada@example.com", "Kept".to_string(), "ats_clean".to_string()), 10)
        .await
        .unwrap()
        .unwrap();
    logs.record(NewDownloadLog {
        cv_id: downloaded.id,
        user_id,
        ip_hash: "0".repeat(64),
        cv_title: downloaded.title.clone(),
    })
    .await
    .unwrap();

    let delete = sqlx::query("DELETE FROM cvs WHERE id = $1")
        .bind(downloaded.id)
        .execute(&pool)
        .await;
    assert!(delete.is_err());
    assert_eq!(logs.count_for_cv(downloaded.id).await.unwrap(), 1);
    assert!(cvs.find_by_id(downloaded.id).await.unwrap().is_some());

    let draft = cvs
        .create(NewCv::with_defaults(user_id, "ada@example.com", "Gone".to_string(), "ats_clean".to_string()), 10)
        .await
        .unwrap()
        .unwrap();
    sqlx::query("DELETE FROM cvs WHERE id = $1")
        .bind(draft.id)
        .execute(&pool)
        .await
        .unwrap();

    let sections: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cv_sections WHERE cv_id = $1")
        .bind(draft.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sections, 0);
}

#[sqlx::test]
async fn test_create_enforces_limit_under_concurrency(pool: PgPool) {
    let user_id = owner(&pool).await;
    let cvs = Arc::new(PgCvRepository::new(Arc::new(pool)));

    let attempts = (0..6).map(|i| {
        let cvs = cvs.clone();
        tokio::spawn(async move {
            cvs.create(
                NewCv::with_defaults(user_id, "ada@example.com", format!("CV {i}"), "ats_clean".to_string()),
                3,
            )
            .await
        })
    });

    let mut created = 0;
    for attempt in attempts.collect::<Vec<_>>() {
        if attempt.await.unwrap().unwrap().is_some() {
            created += 1;
        }
    }

    assert_eq!(created, 3);
    assert_eq!(cvs.list_active_for_user(user_id).await.unwrap().len(), 3);
}
