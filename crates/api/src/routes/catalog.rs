//! Route definitions for the train/coach catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes (read-only, auth required).
///
/// ```text
/// GET /trains                         -> list_trains
/// GET /trains/{train_number}/coaches  -> list_coaches
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trains", get(catalog::list_trains))
        .route("/trains/{train_number}/coaches", get(catalog::list_coaches))
}
