//! Evidence photo handlers: multipart attach and signed read URLs.
//!
//! Uploads are all-or-nothing per request: the whole batch is validated
//! first, then every object is stored, and only then is the complaint row
//! linked to the new keys. A failure at any step leaves the complaint's
//! evidence list untouched.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use coachlog_core::error::CoreError;
use coachlog_core::evidence::{self, EvidenceFile};
use coachlog_core::permission;
use coachlog_core::types::DbId;
use coachlog_db::repositories::ComplaintRepo;
use coachlog_storage::SIGNED_URL_TTL;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RoleContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// One signed read URL, paired with the storage key it resolves.
#[derive(Debug, Serialize)]
pub struct SignedEvidenceUrl {
    pub path: String,
    pub url: String,
    pub expires_in_secs: u64,
}

// ---------------------------------------------------------------------------
// POST /complaints/{id}/evidence
// ---------------------------------------------------------------------------

/// Attach up to three photos to a complaint via multipart upload.
///
/// Requires the same edit rights as a content update: the reporter within
/// the self-edit window on a non-resolved complaint, or admin/in-charge.
pub async fn attach_evidence(
    ctx: RoleContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let current = ComplaintRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Complaint",
            id: id.to_string(),
        }))?;

    let now = Utc::now();
    let actor = permission::ComplaintRef {
        reporter_user_id: current.reporter_user_id,
        status: &current.status,
        created_at: current.created_at,
    };
    if !permission::can_edit_content(actor, ctx.user.user_id, ctx.flags, now) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can no longer edit this complaint".into(),
        )));
    }

    let files = read_multipart_files(&mut multipart).await?;
    let extensions = evidence::validate_batch(&files, current.evidence_paths.len())?;

    // Validation passed for the whole batch; now store every object.
    let mut new_keys = Vec::with_capacity(files.len());
    for (index, (file, ext)) in files.iter().zip(&extensions).enumerate() {
        let key = evidence::storage_key(current.reporter_user_id, current.id, now, index, ext);
        if let Err(e) = state
            .evidence_store
            .upload(&key, file.bytes.clone(), &file.content_type)
            .await
        {
            // Already-stored objects in this batch are unreferenced; log the
            // keys so they can be swept.
            tracing::warn!(
                complaint_id = %id,
                orphaned_keys = ?new_keys,
                error = %e,
                "Evidence batch upload failed partway",
            );
            return Err(AppError::Store(e));
        }
        new_keys.push(key);
    }

    let mut paths = current.evidence_paths.clone();
    paths.extend(new_keys);

    let updated = ComplaintRepo::set_evidence_paths(&state.pool, id, &paths)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Complaint",
            id: id.to_string(),
        }))?;

    tracing::info!(
        complaint_id = %id,
        user_id = %ctx.user.user_id,
        attached = files.len(),
        total = updated.evidence_paths.len(),
        "Evidence attached",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: updated })))
}

/// Drain the multipart stream into memory.
///
/// Size and type limits are enforced by [`evidence::validate_batch`]; the
/// router additionally caps the request body so a client cannot stream an
/// unbounded upload.
async fn read_multipart_files(multipart: &mut Multipart) -> AppResult<Vec<EvidenceFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "photo".to_string());
        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Missing content type for '{file_name}'"))
            })?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read '{file_name}': {e}")))?;

        files.push(EvidenceFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(files)
}

// ---------------------------------------------------------------------------
// GET /complaints/{id}/evidence-urls
// ---------------------------------------------------------------------------

/// Mint short-lived read URLs for every photo on a complaint.
///
/// Objects are private; clients never see a durable URL, only these
/// signed ones.
pub async fn evidence_urls(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let complaint = ComplaintRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Complaint",
            id: id.to_string(),
        }))?;

    let mut urls = Vec::with_capacity(complaint.evidence_paths.len());
    for path in &complaint.evidence_paths {
        let url = state
            .evidence_store
            .signed_url(path, SIGNED_URL_TTL)
            .await
            .map_err(AppError::Store)?;
        urls.push(SignedEvidenceUrl {
            path: path.clone(),
            url,
            expires_in_secs: SIGNED_URL_TTL.as_secs(),
        });
    }

    Ok(Json(DataResponse { data: urls }))
}
