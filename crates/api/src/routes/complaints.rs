//! Route definitions for the `/complaints` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{complaints, evidence};
use crate::state::AppState;

/// Cap on a multipart evidence request: three 5 MB photos plus framing.
const EVIDENCE_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Routes mounted at `/complaints`.
///
/// ```text
/// GET    /                    -> list_complaints
/// POST   /                    -> submit_complaint
/// GET    /{id}                -> get_complaint
/// PATCH  /{id}                -> update_complaint
/// DELETE /{id}                -> delete_complaint (privileged)
/// POST   /{id}/evidence       -> attach_evidence (multipart)
/// GET    /{id}/evidence-urls  -> evidence_urls
/// GET    /{id}/sync-attempts  -> list_sync_attempts (privileged)
/// POST   /{id}/sync           -> redispatch_sync (privileged)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(complaints::list_complaints).post(complaints::submit_complaint),
        )
        .route(
            "/{id}",
            get(complaints::get_complaint)
                .patch(complaints::update_complaint)
                .delete(complaints::delete_complaint),
        )
        .route(
            "/{id}/evidence",
            post(evidence::attach_evidence).layer(DefaultBodyLimit::max(EVIDENCE_BODY_LIMIT)),
        )
        .route("/{id}/evidence-urls", get(evidence::evidence_urls))
        .route("/{id}/sync-attempts", get(complaints::list_sync_attempts))
        .route("/{id}/sync", post(complaints::redispatch_sync))
}
