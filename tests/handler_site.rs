mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test]
async fn test_health_endpoint(pool: PgPool) {
    let server = common::make_server(common::create_test_state(pool));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("cache").is_some());
}

#[sqlx::test]
async fn test_landing_page(pool: PgPool) {
    let server = common::make_server(common::create_test_state(pool));

    let response = server.get("/").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("ATS Clean"));
    assert!(body.contains("/auth/register"));
}

#[sqlx::test]
async fn test_landing_page_greets_user(pool: PgPool) {
    let state = common::create_test_state(pool);
    let ada = common::create_test_user(&state, "Ada Lovelace", "ada@example.com").await;
    let cookie = common::session_cookie(&state, &ada).await;
    let server = common::make_server(state);

    let response = server.get("/").add_header("Cookie", cookie).await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains("/auth/logout"));
}

#[sqlx::test]
async fn test_flash_is_shown_once(pool: PgPool) {
    let server = common::make_server(common::create_test_state(pool));

    let response = server
        .get("/")
        .add_header("Cookie", "cv_flash=info=Hello+there")
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Hello there"));
    let cleared = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|c| c.starts_with("cv_flash=;"));
    assert!(cleared);
}

#[sqlx::test]
async fn test_sitemap_and_robots(pool: PgPool) {
    let server = common::make_server(common::create_test_state(pool));

    let sitemap = server.get("/sitemap.xml").await;
    sitemap.assert_status_ok();
    assert!(
        sitemap
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("application/xml")
    );
    let xml = sitemap.text();
    assert!(xml.contains("<loc>http://cv.test/cv/dashboard</loc>"));

    let robots = server.get("/robots.txt").await;
    robots.assert_status_ok();
    assert!(robots.text().contains("Sitemap: http://cv.test/sitemap.xml"));
}

#[sqlx::test]
async fn test_unknown_path_renders_404_page(pool: PgPool) {
    let server = common::make_server(common::create_test_state(pool));

    let response = server.get("/no/such/page").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("Page not found"));
}
