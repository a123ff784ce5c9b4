//! Repository for the train / coach catalog.

use sqlx::PgPool;

use crate::models::catalog::{CoachFormation, Train};

const TRAIN_COLUMNS: &str = "id, train_number, created_at";
const COACH_COLUMNS: &str =
    "id, train_id, coach_number, class, unit, configuration, capacity, position, created_at";

/// Read-only access to the coach catalog.
pub struct CatalogRepo;

impl CatalogRepo {
    /// All trains, ordered by number.
    pub async fn list_trains(pool: &PgPool) -> Result<Vec<Train>, sqlx::Error> {
        let query = format!("SELECT {TRAIN_COLUMNS} FROM trains ORDER BY train_number");
        sqlx::query_as::<_, Train>(&query).fetch_all(pool).await
    }

    /// Coaches of one train in formation order.
    pub async fn list_coaches(
        pool: &PgPool,
        train_number: &str,
    ) -> Result<Vec<CoachFormation>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM coach_formations c \
             JOIN trains t ON t.id = c.train_id \
             WHERE t.train_number = $1 \
             ORDER BY c.position ASC",
            qualified(COACH_COLUMNS)
        );
        sqlx::query_as::<_, CoachFormation>(&query)
            .bind(train_number)
            .fetch_all(pool)
            .await
    }

    /// Look up one coach of one train; the source of the metadata snapshot
    /// copied into a complaint at submission time.
    pub async fn find_coach(
        pool: &PgPool,
        train_number: &str,
        coach_number: &str,
    ) -> Result<Option<CoachFormation>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM coach_formations c \
             JOIN trains t ON t.id = c.train_id \
             WHERE t.train_number = $1 AND c.coach_number = $2",
            qualified(COACH_COLUMNS)
        );
        sqlx::query_as::<_, CoachFormation>(&query)
            .bind(train_number)
            .bind(coach_number)
            .fetch_optional(pool)
            .await
    }
}

/// Prefix each column with the `c.` alias for joined queries.
fn qualified(columns: &str) -> String {
    columns
        .split(", ")
        .map(|col| format!("c.{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}
