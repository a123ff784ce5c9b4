//! Read-only catalog handlers backing the submission form.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use coachlog_db::repositories::CatalogRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /trains
pub async fn list_trains(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let trains = CatalogRepo::list_trains(&state.pool).await?;
    Ok(Json(DataResponse { data: trains }))
}

/// GET /trains/{train_number}/coaches
///
/// Coaches in formation order. Unknown train numbers return an empty list
/// rather than 404; the submission form treats them the same way.
pub async fn list_coaches(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(train_number): Path<String>,
) -> AppResult<impl IntoResponse> {
    let coaches = CatalogRepo::list_coaches(&state.pool, &train_number).await?;
    Ok(Json(DataResponse { data: coaches }))
}
