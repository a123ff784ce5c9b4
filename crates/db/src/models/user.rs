//! User and profile models.

use serde::Serialize;
use sqlx::FromRow;

use coachlog_core::types::{DbId, Timestamp};

/// A full row from the `users` table, including the password hash.
///
/// Only the auth handlers should ever see this; everything else works with
/// [`Profile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub staff_number: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// The public identity slice denormalized into complaints at creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub staff_number: String,
    pub full_name: String,
}
