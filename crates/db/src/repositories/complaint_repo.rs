//! Repository for the `complaints` table.
//!
//! Content updates take a [`WriteScope`] that re-expresses the caller's
//! edit rights as SQL predicates, so the permission decision made in the
//! API layer is enforced a second time at the storage boundary.

use sqlx::PgPool;

use coachlog_core::complaint::STATUS_RESOLVED;
use coachlog_core::types::{DbId, Timestamp};

use crate::models::complaint::{
    Complaint, ComplaintContentPatch, ComplaintListParams, NewComplaint,
};

/// Hard cap on list results. Callers needing more must narrow their filters.
pub const LIST_CAP: i64 = 500;

/// Column list for `complaints` queries.
const COLUMNS: &str = "\
    id, reporter_user_id, reporter_name, reporter_staff_number, \
    train_number, coach_number, class, unit, configuration, capacity, position, \
    pnr_number, customer_name, berth_number, contact_number, \
    issue_description, action_plan, action_during_service, action_required_in_yard, \
    status, resolved_at, evidence_paths, created_at, updated_at";

/// Who is performing a content write, expressed as row predicates.
#[derive(Debug, Clone, Copy)]
pub enum WriteScope {
    /// Admin/in-charge: no extra predicates.
    Privileged,
    /// The reporting officer: the row must still be theirs, not resolved,
    /// and created after `window_start` (now minus the self-edit window).
    Reporter { user_id: DbId, window_start: Timestamp },
}

/// Provides CRUD operations for complaints.
pub struct ComplaintRepo;

impl ComplaintRepo {
    /// Insert a new complaint with status `open` and no evidence, returning
    /// the full row.
    pub async fn create(pool: &PgPool, input: &NewComplaint) -> Result<Complaint, sqlx::Error> {
        let query = format!(
            "INSERT INTO complaints \
                (reporter_user_id, reporter_name, reporter_staff_number, \
                 train_number, coach_number, class, unit, configuration, capacity, position, \
                 pnr_number, customer_name, berth_number, contact_number, \
                 issue_description, action_plan, action_during_service, action_required_in_yard) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, \
                     $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(input.reporter_user_id)
            .bind(&input.reporter_name)
            .bind(&input.reporter_staff_number)
            .bind(&input.train_number)
            .bind(&input.coach_number)
            .bind(&input.class)
            .bind(&input.unit)
            .bind(&input.configuration)
            .bind(input.capacity)
            .bind(input.position)
            .bind(&input.pnr_number)
            .bind(&input.customer_name)
            .bind(&input.berth_number)
            .bind(&input.contact_number)
            .bind(&input.issue_description)
            .bind(&input.action_plan)
            .bind(&input.action_during_service)
            .bind(&input.action_required_in_yard)
            .fetch_one(pool)
            .await
    }

    /// Find a complaint by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = $1");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List complaints with optional filters, newest first, capped at
    /// [`LIST_CAP`] rows.
    pub async fn list_filtered(
        pool: &PgPool,
        params: &ComplaintListParams,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if params.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if params.train_number.is_some() {
            conditions.push(format!("train_number = ${param_idx}"));
            param_idx += 1;
        }
        if params.coach_number.is_some() {
            conditions.push(format!("coach_number = ${param_idx}"));
            param_idx += 1;
        }
        if params.from.is_some() {
            conditions.push(format!("created_at >= ${param_idx}"));
            param_idx += 1;
        }
        if params.to.is_some() {
            conditions.push(format!("created_at <= ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = params.limit.unwrap_or(LIST_CAP).clamp(1, LIST_CAP);

        let query = format!(
            "SELECT {COLUMNS} FROM complaints {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${param_idx}"
        );

        let mut q = sqlx::query_as::<_, Complaint>(&query);
        if let Some(s) = &params.status {
            q = q.bind(s);
        }
        if let Some(t) = &params.train_number {
            q = q.bind(t);
        }
        if let Some(c) = &params.coach_number {
            q = q.bind(c);
        }
        if let Some(f) = params.from {
            q = q.bind(f);
        }
        if let Some(t) = params.to {
            q = q.bind(t);
        }
        q = q.bind(limit);

        q.fetch_all(pool).await
    }

    /// Apply a content patch to a complaint.
    ///
    /// Only the fields present in the patch are written; reporter identity,
    /// the coach snapshot, status, and evidence are untouchable through this
    /// path. Returns `None` when no row matched, which for a
    /// [`WriteScope::Reporter`] caller also covers "row exists but the edit
    /// window has closed, it was resolved, or it belongs to someone else".
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        patch: &ComplaintContentPatch,
        scope: WriteScope,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        if patch.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut sets: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;
        let mut push_set = |sets: &mut Vec<String>, col: &str| {
            sets.push(format!("{col} = ${param_idx}"));
            param_idx += 1;
        };

        if patch.pnr_number.is_some() {
            push_set(&mut sets, "pnr_number");
        }
        if patch.customer_name.is_some() {
            push_set(&mut sets, "customer_name");
        }
        if patch.berth_number.is_some() {
            push_set(&mut sets, "berth_number");
        }
        if patch.contact_number.is_some() {
            push_set(&mut sets, "contact_number");
        }
        if patch.issue_description.is_some() {
            push_set(&mut sets, "issue_description");
        }
        if patch.action_plan.is_some() {
            push_set(&mut sets, "action_plan");
        }
        if patch.action_during_service.is_some() {
            push_set(&mut sets, "action_during_service");
        }
        if patch.action_required_in_yard.is_some() {
            push_set(&mut sets, "action_required_in_yard");
        }
        sets.push("updated_at = now()".to_string());

        let id_param = param_idx;
        let mut conditions = vec![format!("id = ${id_param}")];
        if let WriteScope::Reporter { .. } = scope {
            conditions.push(format!("reporter_user_id = ${}", id_param + 1));
            conditions.push(format!("status <> '{STATUS_RESOLVED}'"));
            conditions.push(format!("created_at >= ${}", id_param + 2));
        }

        let query = format!(
            "UPDATE complaints SET {} WHERE {} RETURNING {COLUMNS}",
            sets.join(", "),
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_as::<_, Complaint>(&query);
        if let Some(v) = &patch.pnr_number {
            q = q.bind(v);
        }
        if let Some(v) = &patch.customer_name {
            q = q.bind(v);
        }
        if let Some(v) = &patch.berth_number {
            q = q.bind(v);
        }
        if let Some(v) = &patch.contact_number {
            q = q.bind(v.clone());
        }
        if let Some(v) = &patch.issue_description {
            q = q.bind(v);
        }
        if let Some(v) = &patch.action_plan {
            q = q.bind(v);
        }
        if let Some(v) = &patch.action_during_service {
            q = q.bind(v.clone());
        }
        if let Some(v) = &patch.action_required_in_yard {
            q = q.bind(v.clone());
        }
        q = q.bind(id);
        if let WriteScope::Reporter {
            user_id,
            window_start,
        } = scope
        {
            q = q.bind(user_id).bind(window_start);
        }

        q.fetch_optional(pool).await
    }

    /// Change the workflow status.
    ///
    /// Moving to `resolved` stamps `resolved_at`; moving anywhere else
    /// clears it. Returns the updated row if found.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        new_status: &str,
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints \
             SET status = $1, \
                 resolved_at = CASE WHEN $1 = '{STATUS_RESOLVED}' THEN now() ELSE NULL END, \
                 updated_at = now() \
             WHERE id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(new_status)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the evidence path list in a single write.
    ///
    /// Called only after every upload in a batch has succeeded.
    pub async fn set_evidence_paths(
        pool: &PgPool,
        id: DbId,
        paths: &[String],
    ) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!(
            "UPDATE complaints SET evidence_paths = $1, updated_at = now() \
             WHERE id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(paths)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a complaint. Sync audit rows cascade via foreign key.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
