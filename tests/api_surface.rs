// Router-level tests that exercise the request-authorization surface
// without a live database: auth rejection happens in middleware, and the
// invite endpoint validates its code before touching any backend.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use questboard_api::server::app;

fn init_env() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    // Must run before the config singleton is first read
    INIT.call_once(|| {
        std::env::set_var("JWT_SECRET", "api-surface-test-secret");
        std::env::set_var("ADMIN_INVITE_CODE", "sesame");
    });
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_reports_service_info() {
    init_env();

    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("QuestBoard API"));
}

#[tokio::test]
async fn protected_routes_reject_missing_bearer() {
    init_env();

    for uri in [
        "/api/profile",
        "/api/user/stats",
        "/api/dashboard/summary",
        "/api/admin/jobs",
    ] {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {uri}");
        let body = body_json(response).await;
        assert_eq!(body["error"], json!("Missing Authorization header"));
    }
}

#[tokio::test]
async fn protected_routes_reject_garbage_token() {
    init_env();

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/user/stats")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_reject_non_bearer_scheme() {
    init_env();

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/user/stats")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        json!("Authorization header must use Bearer token format")
    );
}

#[tokio::test]
async fn invite_rejects_wrong_code_before_auth() {
    init_env();

    // No credentials at all: the code check comes first
    let response = app()
        .oneshot(post_json("/admin/invite", json!({ "code": "wrong" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "invalid" }));
}

#[tokio::test]
async fn invite_rejects_missing_code_field() {
    init_env();

    let response = app()
        .oneshot(post_json("/admin/invite", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "invalid" }));
}

#[tokio::test]
async fn invite_requires_credentials_when_code_is_correct() {
    init_env();

    let response = app()
        .oneshot(post_json("/admin/invite", json!({ "code": "sesame" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "unauthenticated" }));
}
