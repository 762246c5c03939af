/// Router-level integration tests
///
/// These run against a lazily-connecting pool, so everything that doesn't
/// reach the database works without one: health reporting, the auth layer,
/// and the security headers.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use common::{mint_token, test_router};

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let app = test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["database"], "disconnected");
    assert_eq!(json["status"], "degraded");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    // HSTS only in production mode
    assert!(headers.get("Strict-Transport-Security").is_none());
}

#[tokio::test]
async fn test_v1_requires_credentials() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/projects")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_v1_rejects_non_bearer_header() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/projects")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_v1_rejects_invalid_token() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/projects")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_project_lifecycle_over_http() {
    use taskdeck_shared::db::migrations::run_migrations;
    use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};

    // Migrate first so the router's lazy pool lands on a ready schema.
    let pool = create_pool(DatabaseConfig {
        url: common::database_url(),
        max_connections: 2,
        ..Default::default()
    })
    .await
    .expect("database reachable");
    run_migrations(&pool).await.expect("migrations run");

    let token = mint_token(Uuid::new_v4());

    // Create a project...
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/projects")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": "Acme"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let project: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let project_id = project["id"].as_str().unwrap().to_string();

    // ...its board view has all four empty columns...
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri(format!("/v1/projects/{}/board", project_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let view: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(view["columns"].as_array().unwrap().len(), 4);

    // ...and a stranger can't see the project at all.
    let stranger = mint_token(Uuid::new_v4());
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri(format!("/v1/projects/{}", project_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", stranger))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Cleanup
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/projects/{}", project_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
