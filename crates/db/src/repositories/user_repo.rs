//! Repository for the `users` table.

use sqlx::PgPool;

use coachlog_core::types::DbId;

use crate::models::user::{Profile, User};

const USER_COLUMNS: &str = "id, staff_number, full_name, password_hash, role, created_at";

pub struct UserRepo;

impl UserRepo {
    /// Find a user by staff number (login identifier). Includes the
    /// password hash; auth use only.
    pub async fn find_by_staff_number(
        pool: &PgPool,
        staff_number: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE staff_number = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(staff_number)
            .fetch_optional(pool)
            .await
    }

    /// The identity slice denormalized into a complaint at creation.
    pub async fn find_profile(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT id, staff_number, full_name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a user. Used by seeding and tests.
    pub async fn create(
        pool: &PgPool,
        staff_number: &str,
        full_name: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (staff_number, full_name, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(staff_number)
            .bind(full_name)
            .bind(password_hash)
            .bind(role)
            .fetch_one(pool)
            .await
    }
}
