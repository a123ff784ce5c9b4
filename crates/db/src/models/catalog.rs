//! Train and coach catalog models.

use serde::Serialize;
use sqlx::FromRow;

use coachlog_core::types::{DbId, Timestamp};

/// A row from the `trains` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Train {
    pub id: DbId,
    pub train_number: String,
    pub created_at: Timestamp,
}

/// A row from the `coach_formations` table.
///
/// Complaints copy these fields at submission time; later catalog edits do
/// not propagate to existing complaints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoachFormation {
    pub id: DbId,
    pub train_id: DbId,
    pub coach_number: String,
    pub class: String,
    pub unit: String,
    pub configuration: String,
    pub capacity: i32,
    pub position: i32,
    pub created_at: Timestamp,
}
