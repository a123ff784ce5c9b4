//! End-to-end tests for compliance sync: submission triggers exactly one
//! dispatch, failures stay out of the HTTP response, and the audit
//! endpoints are privileged.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use common::{
    assert_error, create_user, data_json, get_auth, post_json_auth, seed_catalog, token_for,
    valid_complaint_body,
};
use sqlx::PgPool;
use uuid::Uuid;

use coachlog_db::repositories::ComplianceSyncRepo;

/// Spawn a one-route webhook stub returning a fixed status and body.
async fn spawn_webhook(status: StatusCode, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let app = Router::new().route(
        "/",
        post(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/"), hits)
}

/// Poll until the complaint has `expected` audit rows; panics after 5s.
async fn wait_for_attempts(
    pool: &PgPool,
    complaint_id: Uuid,
    expected: usize,
) -> Vec<coachlog_db::models::compliance_sync::SyncAttempt> {
    for _ in 0..100 {
        let attempts = ComplianceSyncRepo::list_for_complaint(pool, complaint_id)
            .await
            .unwrap();
        if attempts.len() >= expected {
            return attempts;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("complaint {complaint_id} never reached {expected} sync attempts");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_dispatches_exactly_once(pool: PgPool) {
    seed_catalog(&pool).await;
    let reporter = create_user(&pool, "NR5001", "officer").await;
    let token = token_for(reporter.id);
    let (url, hits) = spawn_webhook(StatusCode::OK, "ok").await;
    let app = common::build_test_app_with_webhook(pool.clone(), &url);

    let response = post_json_auth(
        app.router,
        "/api/v1/complaints",
        &token,
        valid_complaint_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id: Uuid = data_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let attempts = wait_for_attempts(&pool, id, 1).await;
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].status, "success");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

/// A dead webhook still returns 201 to the submitter; the failure lands in
/// the audit trail only.
#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_failure_never_fails_the_submission(pool: PgPool) {
    seed_catalog(&pool).await;
    let reporter = create_user(&pool, "NR5002", "officer").await;
    let token = token_for(reporter.id);
    let (url, _hits) = spawn_webhook(StatusCode::INTERNAL_SERVER_ERROR, "quota").await;
    let app = common::build_test_app_with_webhook(pool.clone(), &url);

    let response = post_json_auth(
        app.router,
        "/api/v1/complaints",
        &token,
        valid_complaint_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id: Uuid = data_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let attempts = wait_for_attempts(&pool, id, 1).await;
    assert_eq!(attempts[0].status, "failed");
    assert!(attempts[0].message.as_deref().unwrap().contains("500"));
}

/// Content edits do not re-dispatch; only submission and the manual
/// endpoint do.
#[sqlx::test(migrations = "../../db/migrations")]
async fn updates_do_not_redispatch(pool: PgPool) {
    seed_catalog(&pool).await;
    let reporter = create_user(&pool, "NR5003", "officer").await;
    let token = token_for(reporter.id);
    let (url, hits) = spawn_webhook(StatusCode::OK, "ok").await;
    let app = common::build_test_app_with_webhook(pool.clone(), &url);

    let response = post_json_auth(
        app.router.clone(),
        "/api/v1/complaints",
        &token,
        valid_complaint_body(),
    )
    .await;
    let id: Uuid = data_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    wait_for_attempts(&pool, id, 1).await;

    let response = common::patch_json_auth(
        app.router,
        &format!("/api/v1/complaints/{id}"),
        &token,
        serde_json::json!({ "action_plan": "Replace the whole light cluster" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Give a wrongly queued dispatch time to land before asserting.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    let attempts = ComplianceSyncRepo::list_for_complaint(&pool, id).await.unwrap();
    assert_eq!(attempts.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_redispatch_appends_a_row(pool: PgPool) {
    seed_catalog(&pool).await;
    let reporter = create_user(&pool, "NR5004", "officer").await;
    let admin = create_user(&pool, "NR5005", "admin").await;
    let (url, _hits) = spawn_webhook(StatusCode::OK, "ok").await;
    let app = common::build_test_app_with_webhook(pool.clone(), &url);

    let response = post_json_auth(
        app.router.clone(),
        "/api/v1/complaints",
        &token_for(reporter.id),
        valid_complaint_body(),
    )
    .await;
    let id: Uuid = data_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    wait_for_attempts(&pool, id, 1).await;

    let response = post_json_auth(
        app.router,
        &format!("/api/v1/complaints/{id}/sync"),
        &token_for(admin.id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let attempts = wait_for_attempts(&pool, id, 2).await;
    assert_eq!(attempts.len(), 2);
}

// ---------------------------------------------------------------------------
// Audit endpoint access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sync_attempts_endpoint_requires_privilege(pool: PgPool) {
    seed_catalog(&pool).await;
    let reporter = create_user(&pool, "NR5006", "officer").await;
    let in_charge = create_user(&pool, "NR5007", "in_charge").await;
    let (url, _hits) = spawn_webhook(StatusCode::OK, "ok").await;
    let app = common::build_test_app_with_webhook(pool.clone(), &url);

    let response = post_json_auth(
        app.router.clone(),
        "/api/v1/complaints",
        &token_for(reporter.id),
        valid_complaint_body(),
    )
    .await;
    let id: Uuid = data_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    wait_for_attempts(&pool, id, 1).await;

    let uri = format!("/api/v1/complaints/{id}/sync-attempts");

    let response = get_auth(app.router.clone(), &uri, &token_for(reporter.id)).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = get_auth(app.router, &uri, &token_for(in_charge.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let attempts = data_json(response).await;
    assert_eq!(attempts.as_array().unwrap().len(), 1);
    assert_eq!(attempts[0]["status"], "success");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn redispatch_requires_privilege(pool: PgPool) {
    seed_catalog(&pool).await;
    let reporter = create_user(&pool, "NR5008", "officer").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.router.clone(),
        "/api/v1/complaints",
        &token_for(reporter.id),
        valid_complaint_body(),
    )
    .await;
    let id = data_json(response).await["id"].as_str().unwrap().to_string();

    let response = post_json_auth(
        app.router,
        &format!("/api/v1/complaints/{id}/sync"),
        &token_for(reporter.id),
        serde_json::json!({}),
    )
    .await;

    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}
