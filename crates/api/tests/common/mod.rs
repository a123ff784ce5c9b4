//! Shared harness for HTTP-level integration tests.
//!
//! Builds the production router (`build_app_router`) over a per-test
//! database, an in-memory evidence store, and a real sync dispatcher, then
//! drives it with `tower::ServiceExt::oneshot` -- no TCP listener needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use coachlog_api::auth::jwt::{generate_access_token, JwtConfig};
use coachlog_api::auth::password::hash_password;
use coachlog_api::config::ServerConfig;
use coachlog_api::router::build_app_router;
use coachlog_api::state::AppState;
use coachlog_core::types::DbId;
use coachlog_db::models::user::User;
use coachlog_db::repositories::UserRepo;
use coachlog_storage::MemoryEvidenceStore;
use coachlog_sync::dispatcher::{SyncConfig, SyncDispatcher};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        evidence_bucket: "test-evidence".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// The assembled test application plus the handles tests poke at directly.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryEvidenceStore>,
}

/// Build the app with an unreachable sync webhook (TCP port 9, discard).
///
/// Sync failures never propagate to callers, so tests that are not about
/// sync can ignore the failed audit rows this produces.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with_webhook(pool, "http://127.0.0.1:9/hook")
}

/// Build the app pointing the sync worker at the given webhook URL.
pub fn build_test_app_with_webhook(pool: PgPool, webhook_url: &str) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryEvidenceStore::new());

    let sync_config = SyncConfig {
        webhook_url: webhook_url.to_string(),
        queue_capacity: 16,
    };
    let cancel = tokio_util::sync::CancellationToken::new();
    let (sync, _handle) = SyncDispatcher::start(pool.clone(), sync_config, cancel);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        evidence_store: store.clone(),
        sync,
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
    }
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

pub const TEST_PASSWORD: &str = "depot_password_1!";

/// Create a user directly in the database with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, staff_number: &str, role: &str) -> User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        staff_number,
        &format!("Test User {staff_number}"),
        &hashed,
        role,
    )
    .await
    .expect("user creation should succeed")
}

/// Mint a valid access token for a user id, signed with the test secret.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Catalog seeding
// ---------------------------------------------------------------------------

/// Insert train 12951 with coaches B4 (3A) and A1 (2A).
pub async fn seed_catalog(pool: &PgPool) {
    let train_id: DbId =
        sqlx::query_scalar("INSERT INTO trains (train_number) VALUES ('12951') RETURNING id")
            .fetch_one(pool)
            .await
            .expect("train insert should succeed");

    for (coach, class, unit, position) in
        [("B4", "3A", "LHB", 1), ("A1", "2A", "LHB", 2)]
    {
        sqlx::query(
            "INSERT INTO coach_formations \
             (train_id, coach_number, class, unit, configuration, capacity, position) \
             VALUES ($1, $2, $3, $4, '72-berth', 72, $5)",
        )
        .bind(train_id)
        .bind(coach)
        .bind(class)
        .bind(unit)
        .bind(position)
        .execute(pool)
        .await
        .expect("coach insert should succeed");
    }
}

/// A valid submission body against the seeded catalog (train 12951 / B4).
pub fn valid_complaint_body() -> serde_json::Value {
    serde_json::json!({
        "train_number": "12951",
        "coach_number": "B4",
        "pnr_number": "1234567890",
        "customer_name": "A. Passenger",
        "berth_number": "24",
        "contact_number": "+91 98765-43210",
        "issue_description": "Reading light above berth 24 not working",
        "action_plan": "Replace light fitting at next yard halt",
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart batch of evidence files, each as a `photos` field.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    files: &[(&str, &str, &[u8])],
) -> Response<Body> {
    const BOUNDARY: &str = "----coachlog-test-boundary";

    let mut body = Vec::new();
    for (file_name, content_type, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"photos\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Unwrap the standard `{"data": ...}` envelope.
pub async fn data_json(response: Response<Body>) -> serde_json::Value {
    let mut json = body_json(response).await;
    json["data"].take()
}

/// Assert the standard error envelope and return it.
pub async fn assert_error(
    response: Response<Body>,
    status: StatusCode,
    code: &str,
) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert!(json["error"].is_string(), "error message must be a string");
    json
}
