mod common;

use axum::http::StatusCode;
use cv_builder::infrastructure::cache::preview_key;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_preview_is_public_and_escaped(pool: PgPool) {
    let state = common::create_test_state(pool);
    let ada = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let cv = common::create_test_cv(&state, &ada, "Ada CV").await;
    let personal = state.section_service.list(cv.id).await.unwrap().remove(0);
    state
        .section_service
        .update(
            cv.id,
            personal.id,
            ada.id,
            cv_builder::domain::entities::SectionPatch {
                content: Some(json!({ "name": "Ada <b>Lovelace</b>", "email": "ada@example.com" })),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let server = common::make_server(state);

    let response = server.get(&format!("/cv/{}/preview", cv.id)).await;

    response.assert_status_ok();
    let html = response.text();
    assert!(!html.contains("<b>Lovelace"));
    assert!(html.contains("Ada &#60;b&#62;Lovelace&#60;/b&#62;"));
    assert!(html.contains("mailto:ada@example.com"));
    assert!(html.contains("tpl-ats_clean"));
}

#[sqlx::test]
async fn test_preview_of_deleted_cv_is_404(pool: PgPool) {
    let state = common::create_test_state(pool);
    let ada = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let cv = common::create_test_cv(&state, &ada, "Ada CV").await;
    state.cv_service.delete_cv(cv.id, ada.id).await.unwrap();
    let server = common::make_server(state);

    server
        .get(&format!("/cv/{}/preview", cv.id))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_download_pdf_records_log(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let ada = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let cv = common::create_test_cv(&state, &ada, "Ada CV").await;
    let cookie = common::session_cookie(&state, &ada).await;
    let server = common::make_server(state);

    let response = server
        .get(&format!("/cv/{}/download", cv.id))
        .add_header("Cookie", cookie)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"Ada_CV_CV_"));
    assert!(disposition.contains(".pdf"));
    assert_eq!(response.as_bytes().as_ref(), common::FAKE_PDF);

    assert_eq!(common::count_download_logs(&pool, cv.id).await, 1);
}

#[sqlx::test]
async fn test_download_foreign_cv_is_forbidden(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let ada = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let bob = common::create_test_user(&state, "Bob", "bob@example.com").await;
    let cv = common::create_test_cv(&state, &ada, "Ada CV").await;
    let cookie = common::session_cookie(&state, &bob).await;
    let server = common::make_server(state);

    let response = server
        .get(&format!("/cv/{}/download", cv.id))
        .add_header("Cookie", cookie)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(response.text().contains("You can only download your own CVs."));
    assert_eq!(common::count_download_logs(&pool, cv.id).await, 0);
}

#[sqlx::test]
async fn test_download_without_renderer_redirects_to_editor(pool: PgPool) {
    let state = common::create_test_state_without_pdf(pool.clone());
    let ada = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let cv = common::create_test_cv(&state, &ada, "Ada CV").await;
    let cookie = common::session_cookie(&state, &ada).await;
    let server = common::make_server(state);

    let response = server
        .get(&format!("/cv/{}/download", cv.id))
        .add_header("Cookie", cookie)
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location"),
        format!("/cv/{}/edit", cv.id).as_str()
    );
    assert_eq!(common::count_download_logs(&pool, cv.id).await, 0);
}

#[sqlx::test]
async fn test_download_requires_login(pool: PgPool) {
    let state = common::create_test_state(pool);
    let ada = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let cv = common::create_test_cv(&state, &ada, "Ada CV").await;
    let server = common::make_server(state);

    let response = server.get(&format!("/cv/{}/download", cv.id)).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert!(
        response
            .header("location")
            .to_str()
            .unwrap()
            .starts_with("/auth/login?next=")
    );
}

fn preview_invalidations(cache: &common::MemoryCache, cv_id: uuid::Uuid) -> usize {
    let key = preview_key(cv_id);
    cache.invalidated().iter().filter(|k| **k == key).count()
}

#[sqlx::test]
async fn test_section_writes_invalidate_preview(pool: PgPool) {
    let cache = Arc::new(common::MemoryCache::default());
    let state = common::create_test_state_with_cache(pool, cache.clone());
    let ada = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let cv = common::create_test_cv(&state, &ada, "Ada CV").await;
    let personal = state.section_service.list(cv.id).await.unwrap().remove(0);
    let cookie = common::session_cookie(&state, &ada).await;
    let server = common::make_server(state);
    let preview = format!("/cv/{}/preview", cv.id);
    let sections = format!("/cv/api/{}/sections", cv.id);

    server.get(&preview).await.assert_status_ok();
    assert!(cache.contains(&preview_key(cv.id)));

    let created = server
        .post(&sections)
        .add_header("Cookie", cookie.clone())
        .json(&json!({ "section_type": "summary", "content": { "text": "Engineer" } }))
        .await;
    created.assert_status_ok();
    assert_eq!(preview_invalidations(&cache, cv.id), 1);
    assert!(!cache.contains(&preview_key(cv.id)));
    let summary_id = created.json::<Value>()["section"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    server.get(&preview).await.assert_status_ok();
    server
        .put(&format!("{sections}/{}", personal.id))
        .add_header("Cookie", cookie.clone())
        .json(&json!({ "content": { "name": "Augusta Ada King" } }))
        .await
        .assert_status_ok();
    assert_eq!(preview_invalidations(&cache, cv.id), 2);

    let html = server.get(&preview).await.text();
    assert!(html.contains("Augusta Ada King"));

    server
        .delete(&format!("{sections}/{summary_id}"))
        .add_header("Cookie", cookie)
        .await
        .assert_status_ok();
    assert_eq!(preview_invalidations(&cache, cv.id), 3);
    assert!(!cache.contains(&preview_key(cv.id)));
}

#[sqlx::test]
async fn test_cv_writes_invalidate_preview(pool: PgPool) {
    let cache = Arc::new(common::MemoryCache::default());
    let state = common::create_test_state_with_cache(pool, cache.clone());
    let ada = common::create_test_user(&state, "Ada", "ada@example.com").await;
    let cv = common::create_test_cv(&state, &ada, "Ada CV").await;
    let cookie = common::session_cookie(&state, &ada).await;
    let server = common::make_server(state);
    let preview = format!("/cv/{}/preview", cv.id);

    server.get(&preview).await.assert_status_ok();
    server
        .put(&format!("/cv/api/{}/meta", cv.id))
        .add_header("Cookie", cookie.clone())
        .json(&json!({ "template_slug": "ats_executive" }))
        .await
        .assert_status_ok();
    assert_eq!(preview_invalidations(&cache, cv.id), 1);
    assert!(server.get(&preview).await.text().contains("tpl-ats_executive"));

    server
        .post(&format!("/cv/{}/delete", cv.id))
        .add_header("Cookie", cookie)
        .await
        .assert_status_ok();
    assert_eq!(preview_invalidations(&cache, cv.id), 2);
    assert!(!cache.contains(&preview_key(cv.id)));
    server.get(&preview).await.assert_status_not_found();
}
