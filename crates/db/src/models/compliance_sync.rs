//! Compliance sync audit model.

use serde::Serialize;
use sqlx::FromRow;

use coachlog_core::types::{DbId, Timestamp};

/// Outcome value for a successful sync attempt.
pub const SYNC_SUCCESS: &str = "success";
/// Outcome value for a failed sync attempt.
pub const SYNC_FAILED: &str = "failed";

/// A row from the append-only `compliance_sync` table.
///
/// One row per replication attempt; rows are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SyncAttempt {
    pub id: DbId,
    pub complaint_id: DbId,
    pub attempt_at: Timestamp,
    pub status: String,
    pub message: Option<String>,
    pub created_at: Timestamp,
}
