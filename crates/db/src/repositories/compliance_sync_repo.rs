//! Repository for the append-only `compliance_sync` audit table.

use sqlx::PgPool;

use coachlog_core::types::DbId;

use crate::models::compliance_sync::SyncAttempt;

const COLUMNS: &str = "id, complaint_id, attempt_at, status, message, created_at";

/// Records and reads compliance sync attempts. There is deliberately no
/// update or delete: the table is the audit trail.
pub struct ComplianceSyncRepo;

impl ComplianceSyncRepo {
    /// Append one attempt row.
    pub async fn record(
        pool: &PgPool,
        complaint_id: DbId,
        status: &str,
        message: Option<&str>,
    ) -> Result<SyncAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO compliance_sync (complaint_id, status, message) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SyncAttempt>(&query)
            .bind(complaint_id)
            .bind(status)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    /// All attempts for one complaint, oldest first.
    pub async fn list_for_complaint(
        pool: &PgPool,
        complaint_id: DbId,
    ) -> Result<Vec<SyncAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM compliance_sync \
             WHERE complaint_id = $1 ORDER BY attempt_at ASC"
        );
        sqlx::query_as::<_, SyncAttempt>(&query)
            .bind(complaint_id)
            .fetch_all(pool)
            .await
    }
}
