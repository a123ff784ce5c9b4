pub mod auth;
pub mod catalog;
pub mod complaints;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                           login (public)
///
/// /trains                               list trains
/// /trains/{train_number}/coaches        coach formation for one train
///
/// /complaints                           list, submit
/// /complaints/{id}                      get, patch, delete
/// /complaints/{id}/evidence             attach photos (multipart)
/// /complaints/{id}/evidence-urls        signed read URLs
/// /complaints/{id}/sync-attempts        compliance sync audit (privileged)
/// /complaints/{id}/sync                 manual re-dispatch (privileged)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (login only; tokens are short-lived and stateless).
        .nest("/auth", auth::router())
        // Train and coach catalog.
        .merge(catalog::router())
        // Complaint lifecycle, evidence, and sync audit.
        .nest("/complaints", complaints::router())
}
