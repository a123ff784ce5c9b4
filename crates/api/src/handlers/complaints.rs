//! Complaint lifecycle handlers: submit, list, get, patch, delete, plus
//! the compliance sync audit view and manual re-dispatch.
//!
//! Permission is evaluated against freshly read state on every mutating
//! call, and content writes re-apply the same predicate inside the SQL
//! `WHERE` clause ([`WriteScope`]) so the storage layer independently
//! enforces what the handler already checked.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};

use coachlog_core::complaint;
use coachlog_core::error::CoreError;
use coachlog_core::permission::{self, ComplaintRef, SELF_EDIT_WINDOW_HOURS};
use coachlog_core::types::DbId;
use coachlog_db::models::complaint::{
    Complaint, ComplaintContentPatch, ComplaintListParams, CreateComplaint, NewComplaint,
    UpdateComplaint,
};
use coachlog_db::repositories::{CatalogRepo, ComplaintRepo, ComplianceSyncRepo, UserRepo, WriteScope};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequirePrivileged, RoleContext};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn fetch_complaint(pool: &sqlx::PgPool, id: DbId) -> AppResult<Complaint> {
    ComplaintRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Complaint",
            id: id.to_string(),
        }))
}

fn complaint_ref(c: &Complaint) -> ComplaintRef<'_> {
    ComplaintRef {
        reporter_user_id: c.reporter_user_id,
        status: &c.status,
        created_at: c.created_at,
    }
}

// ---------------------------------------------------------------------------
// POST /complaints
// ---------------------------------------------------------------------------

/// Submit a new complaint.
///
/// Reporter identity comes from the session profile, coach metadata is
/// snapshotted from the catalog, and the new row is handed to the sync
/// dispatcher after the write. A down webhook or full queue never fails
/// the submission.
pub async fn submit_complaint(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateComplaint>,
) -> AppResult<impl IntoResponse> {
    // Validate everything before any write.
    complaint::validate_pnr(&input.pnr_number)?;
    complaint::validate_customer_name(&input.customer_name)?;
    complaint::validate_berth(&input.berth_number)?;
    complaint::validate_issue_description(&input.issue_description)?;
    complaint::validate_action_plan(&input.action_plan)?;
    let contact_number = complaint::normalize_contact_number(input.contact_number.as_deref())?;

    let coach = CatalogRepo::find_coach(&state.pool, &input.train_number, &input.coach_number)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Coach",
                id: format!("{}/{}", input.train_number, input.coach_number),
            })
        })?;

    // Reporter fields come from the stored profile, not the request body,
    // so a client cannot file complaints as someone else.
    let profile = UserRepo::find_profile(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("No profile for user {}", auth.user_id))
        })?;

    let new = NewComplaint {
        reporter_user_id: profile.id,
        reporter_name: profile.full_name,
        reporter_staff_number: profile.staff_number,
        train_number: input.train_number,
        coach_number: coach.coach_number,
        class: coach.class,
        unit: coach.unit,
        configuration: coach.configuration,
        capacity: coach.capacity,
        position: coach.position,
        pnr_number: input.pnr_number.trim().to_string(),
        customer_name: input.customer_name.trim().to_string(),
        berth_number: input.berth_number.trim().to_string(),
        contact_number,
        issue_description: input.issue_description.trim().to_string(),
        action_plan: input.action_plan.trim().to_string(),
        action_during_service: complaint::normalize_optional_text(
            input.action_during_service.as_deref(),
        ),
        action_required_in_yard: complaint::normalize_optional_text(
            input.action_required_in_yard.as_deref(),
        ),
    };

    let created = ComplaintRepo::create(&state.pool, &new).await?;

    // Fire-and-forget replication; once per creation, not per update.
    state.sync.dispatch(created.id);

    tracing::info!(
        complaint_id = %created.id,
        train = %created.train_number,
        coach = %created.coach_number,
        reporter = %created.reporter_user_id,
        "Complaint submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /complaints
// ---------------------------------------------------------------------------

/// List complaints, newest first. All authenticated users see all rows;
/// the result is capped at 500, so callers narrow with the status, coach,
/// and date-range filters rather than paginate.
pub async fn list_complaints(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ComplaintListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        complaint::validate_status(status)?;
    }
    let complaints = ComplaintRepo::list_filtered(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: complaints }))
}

// ---------------------------------------------------------------------------
// GET /complaints/{id}
// ---------------------------------------------------------------------------

pub async fn get_complaint(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = fetch_complaint(&state.pool, id).await?;
    Ok(Json(DataResponse { data: found }))
}

// ---------------------------------------------------------------------------
// PATCH /complaints/{id}
// ---------------------------------------------------------------------------

/// Apply a partial update.
///
/// `status` is honoured only for admin/in-charge callers and silently
/// dropped otherwise. Content fields require edit rights on the current
/// row; attempting them without rights is a 403 even when the stripped
/// patch would simply be empty.
pub async fn update_complaint(
    ctx: RoleContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<UpdateComplaint>,
) -> AppResult<impl IntoResponse> {
    let current = fetch_complaint(&state.pool, id).await?;

    let now = Utc::now();
    let privileged = ctx.flags.is_admin_or_in_charge();
    let wants_content = patch.has_content_fields();

    if wants_content
        && !permission::can_edit_content(complaint_ref(&current), ctx.user.user_id, ctx.flags, now)
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can no longer edit this complaint".into(),
        )));
    }

    let mut updated = current;

    if wants_content {
        let content = build_content_patch(&patch)?;
        let scope = if privileged {
            WriteScope::Privileged
        } else {
            WriteScope::Reporter {
                user_id: ctx.user.user_id,
                window_start: now - Duration::hours(SELF_EDIT_WINDOW_HOURS),
            }
        };

        updated = match ComplaintRepo::update_content(&state.pool, id, &content, scope).await? {
            Some(row) => row,
            // The row was there a moment ago; either it was deleted or it
            // slipped outside the reporter's scope between read and write.
            None => match ComplaintRepo::find_by_id(&state.pool, id).await? {
                Some(_) => {
                    return Err(AppError::Core(CoreError::Forbidden(
                        "You can no longer edit this complaint".into(),
                    )))
                }
                None => {
                    return Err(AppError::Core(CoreError::NotFound {
                        entity: "Complaint",
                        id: id.to_string(),
                    }))
                }
            },
        };
    }

    // Status is applied second; an unprivileged caller's status field has
    // already been dropped on the floor by this point.
    if let Some(status) = patch.status.as_deref().filter(|_| privileged) {
        complaint::validate_status(status)?;
        if let Some(row) = ComplaintRepo::update_status(&state.pool, id, status).await? {
            tracing::info!(
                complaint_id = %id,
                from = %updated.status,
                to = %status,
                user_id = %ctx.user.user_id,
                "Complaint status updated",
            );
            updated = row;
        }
    }

    Ok(Json(DataResponse { data: updated }))
}

/// Normalize and validate the content portion of a patch.
fn build_content_patch(patch: &UpdateComplaint) -> AppResult<ComplaintContentPatch> {
    let mut content = ComplaintContentPatch::default();

    if let Some(v) = &patch.pnr_number {
        complaint::validate_pnr(v)?;
        content.pnr_number = Some(v.trim().to_string());
    }
    if let Some(v) = &patch.customer_name {
        complaint::validate_customer_name(v)?;
        content.customer_name = Some(v.trim().to_string());
    }
    if let Some(v) = &patch.berth_number {
        complaint::validate_berth(v)?;
        content.berth_number = Some(v.trim().to_string());
    }
    if let Some(v) = &patch.contact_number {
        // A present-but-blank value clears the column.
        content.contact_number = Some(complaint::normalize_contact_number(Some(v.as_str()))?);
    }
    if let Some(v) = &patch.issue_description {
        complaint::validate_issue_description(v)?;
        content.issue_description = Some(v.trim().to_string());
    }
    if let Some(v) = &patch.action_plan {
        complaint::validate_action_plan(v)?;
        content.action_plan = Some(v.trim().to_string());
    }
    if let Some(v) = &patch.action_during_service {
        content.action_during_service = Some(complaint::normalize_optional_text(Some(v.as_str())));
    }
    if let Some(v) = &patch.action_required_in_yard {
        content.action_required_in_yard =
            Some(complaint::normalize_optional_text(Some(v.as_str())));
    }

    Ok(content)
}

// ---------------------------------------------------------------------------
// DELETE /complaints/{id}
// ---------------------------------------------------------------------------

/// Hard-delete a complaint. Admin/in-charge only; sync audit rows go with
/// it via the foreign key.
pub async fn delete_complaint(
    RequirePrivileged(ctx): RequirePrivileged,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ComplaintRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Complaint",
            id: id.to_string(),
        }));
    }

    tracing::info!(complaint_id = %id, user_id = %ctx.user.user_id, "Complaint deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /complaints/{id}/sync-attempts
// ---------------------------------------------------------------------------

/// The compliance sync audit trail for one complaint. Admin/in-charge only.
pub async fn list_sync_attempts(
    RequirePrivileged(_ctx): RequirePrivileged,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    fetch_complaint(&state.pool, id).await?;
    let attempts = ComplianceSyncRepo::list_for_complaint(&state.pool, id).await?;
    Ok(Json(DataResponse { data: attempts }))
}

// ---------------------------------------------------------------------------
// POST /complaints/{id}/sync
// ---------------------------------------------------------------------------

/// Manually re-dispatch a complaint to the compliance webhook, e.g. after
/// a failed attempt. Admin/in-charge only.
pub async fn redispatch_sync(
    RequirePrivileged(ctx): RequirePrivileged,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    fetch_complaint(&state.pool, id).await?;
    state.sync.dispatch(id);

    tracing::info!(complaint_id = %id, user_id = %ctx.user.user_id, "Manual sync re-dispatch");

    Ok(StatusCode::ACCEPTED)
}
