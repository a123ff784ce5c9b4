//! HTTP-level integration tests for login and token handling.

mod common;

use axum::http::StatusCode;
use common::{assert_error, body_json, create_user, get_auth, post_json, TEST_PASSWORD};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token_and_profile(pool: PgPool) {
    let user = create_user(&pool, "NR1001", "officer").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "staff_number": "NR1001", "password": TEST_PASSWORD });
    let response = post_json(app.router, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["user"]["id"], user.id.to_string());
    assert_eq!(json["data"]["user"]["staff_number"], "NR1001");
    // The password hash must never appear in a response.
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_wrong_password_returns_401(pool: PgPool) {
    create_user(&pool, "NR1002", "officer").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "staff_number": "NR1002", "password": "wrong" });
    let response = post_json(app.router, "/api/v1/auth/login", body).await;

    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

/// Unknown staff numbers get the same 401 message as a wrong password, so
/// login cannot be used to probe which staff numbers exist.
#[sqlx::test(migrations = "../../db/migrations")]
async fn login_unknown_staff_number_is_indistinguishable(pool: PgPool) {
    create_user(&pool, "NR1003", "officer").await;
    let app = common::build_test_app(pool);

    let wrong_pw = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "staff_number": "NR1003", "password": "wrong" }),
    )
    .await;
    let unknown = post_json(
        app.router,
        "/api/v1/auth/login",
        serde_json::json!({ "staff_number": "GHOST", "password": "wrong" }),
    )
    .await;

    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let a = body_json(wrong_pw).await;
    let b = body_json(unknown).await;
    assert_eq!(a["error"], b["error"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/complaints")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_with_garbage_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app.router, "/api/v1/complaints", "not-a-jwt").await;

    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

/// Health stays reachable without a token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn health_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
