//! Complaint entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use coachlog_core::types::{DbId, Timestamp};

/// A row from the `complaints` table.
///
/// Reporter fields and the coach metadata snapshot are written once at
/// creation and never touched by any update path.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Complaint {
    pub id: DbId,
    pub reporter_user_id: DbId,
    pub reporter_name: String,
    pub reporter_staff_number: String,
    pub train_number: String,
    pub coach_number: String,
    pub class: String,
    pub unit: String,
    pub configuration: String,
    pub capacity: i32,
    pub position: i32,
    pub pnr_number: String,
    pub customer_name: String,
    pub berth_number: String,
    pub contact_number: Option<String>,
    pub issue_description: String,
    pub action_plan: String,
    pub action_during_service: Option<String>,
    pub action_required_in_yard: Option<String>,
    pub status: String,
    pub resolved_at: Option<Timestamp>,
    pub evidence_paths: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Client-facing DTO for submitting a complaint.
///
/// Reporter identity is deliberately absent: it is taken from the
/// authenticated session, never from the request body. Coach metadata is
/// resolved server-side from the catalog.
#[derive(Debug, Deserialize)]
pub struct CreateComplaint {
    pub train_number: String,
    pub coach_number: String,
    pub pnr_number: String,
    pub customer_name: String,
    pub berth_number: String,
    pub contact_number: Option<String>,
    pub issue_description: String,
    pub action_plan: String,
    pub action_during_service: Option<String>,
    pub action_required_in_yard: Option<String>,
}

/// Fully resolved insert payload: draft fields normalized, coach metadata
/// snapshotted from the catalog, reporter identity from the session.
#[derive(Debug)]
pub struct NewComplaint {
    pub reporter_user_id: DbId,
    pub reporter_name: String,
    pub reporter_staff_number: String,
    pub train_number: String,
    pub coach_number: String,
    pub class: String,
    pub unit: String,
    pub configuration: String,
    pub capacity: i32,
    pub position: i32,
    pub pnr_number: String,
    pub customer_name: String,
    pub berth_number: String,
    pub contact_number: Option<String>,
    pub issue_description: String,
    pub action_plan: String,
    pub action_during_service: Option<String>,
    pub action_required_in_yard: Option<String>,
}

/// Client-facing PATCH body. Absent fields are left unchanged.
///
/// `status` is only honoured for admin/in-charge callers; for anyone else
/// it is silently dropped rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateComplaint {
    pub pnr_number: Option<String>,
    pub customer_name: Option<String>,
    pub berth_number: Option<String>,
    pub contact_number: Option<String>,
    pub issue_description: Option<String>,
    pub action_plan: Option<String>,
    pub action_during_service: Option<String>,
    pub action_required_in_yard: Option<String>,
    pub status: Option<String>,
}

impl UpdateComplaint {
    /// Does the patch touch any content field (everything except `status`)?
    pub fn has_content_fields(&self) -> bool {
        self.pnr_number.is_some()
            || self.customer_name.is_some()
            || self.berth_number.is_some()
            || self.contact_number.is_some()
            || self.issue_description.is_some()
            || self.action_plan.is_some()
            || self.action_during_service.is_some()
            || self.action_required_in_yard.is_some()
    }
}

/// Normalized, validated content changes ready to be written.
///
/// Nullable columns use `Option<Option<String>>`: the outer `None` means
/// "leave unchanged", an inner `None` means "set NULL".
#[derive(Debug, Default)]
pub struct ComplaintContentPatch {
    pub pnr_number: Option<String>,
    pub customer_name: Option<String>,
    pub berth_number: Option<String>,
    pub contact_number: Option<Option<String>>,
    pub issue_description: Option<String>,
    pub action_plan: Option<String>,
    pub action_during_service: Option<Option<String>>,
    pub action_required_in_yard: Option<Option<String>>,
}

impl ComplaintContentPatch {
    pub fn is_empty(&self) -> bool {
        self.pnr_number.is_none()
            && self.customer_name.is_none()
            && self.berth_number.is_none()
            && self.contact_number.is_none()
            && self.issue_description.is_none()
            && self.action_plan.is_none()
            && self.action_during_service.is_none()
            && self.action_required_in_yard.is_none()
    }
}

/// Query parameters for listing complaints.
#[derive(Debug, Default, Deserialize)]
pub struct ComplaintListParams {
    pub status: Option<String>,
    pub train_number: Option<String>,
    pub coach_number: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
}
