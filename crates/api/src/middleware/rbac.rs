//! Role resolution and privilege extractors.
//!
//! Privilege is a per-request snapshot derived from the database, never
//! cached and never read from the token. Resolution failures produce
//! [`RoleFlags::Denied`] (fail closed) rather than an error, so a flaky
//! role lookup downgrades a caller instead of breaking reads.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use coachlog_core::error::CoreError;
use coachlog_core::permission::RoleFlags;
use coachlog_db::repositories::RoleRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated user plus their freshly resolved privilege snapshot.
///
/// ```ignore
/// async fn handler(ctx: RoleContext) -> AppResult<Json<()>> {
///     if ctx.flags.is_admin_or_in_charge() { /* ... */ }
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RoleContext {
    pub user: AuthUser,
    pub flags: RoleFlags,
}

impl FromRequestParts<AppState> for RoleContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let flags = RoleRepo::resolve_flags(&state.pool, user.user_id).await;
        Ok(RoleContext { user, flags })
    }
}

/// Requires the admin or in-charge role. Rejects with 403 Forbidden
/// otherwise.
///
/// ```ignore
/// async fn supervisors_only(RequirePrivileged(ctx): RequirePrivileged) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePrivileged(pub RoleContext);

impl FromRequestParts<AppState> for RequirePrivileged {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = RoleContext::from_request_parts(parts, state).await?;
        if !ctx.flags.is_admin_or_in_charge() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or in-charge role required".into(),
            )));
        }
        Ok(RequirePrivileged(ctx))
    }
}
