//! Role predicate queries backing [`RoleFlags`] resolution.
//!
//! Three independent yes/no questions, answered fresh for every request.
//! The resolver combines them and fails closed: any error from any
//! predicate yields the denied snapshot, never partial trust.
//!
//! [`RoleFlags`]: coachlog_core::permission::RoleFlags

use sqlx::PgPool;

use coachlog_core::permission::RoleFlags;
use coachlog_core::roles::{ROLE_ADMIN, ROLE_IN_CHARGE};
use coachlog_core::types::DbId;

pub struct RoleRepo;

impl RoleRepo {
    pub async fn is_admin(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        Self::has_role(pool, user_id, &[ROLE_ADMIN]).await
    }

    pub async fn is_in_charge(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        Self::has_role(pool, user_id, &[ROLE_IN_CHARGE]).await
    }

    pub async fn is_admin_or_in_charge(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        Self::has_role(pool, user_id, &[ROLE_ADMIN, ROLE_IN_CHARGE]).await
    }

    async fn has_role(pool: &PgPool, user_id: DbId, roles: &[&str]) -> Result<bool, sqlx::Error> {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        let found: Option<(bool,)> =
            sqlx::query_as("SELECT true FROM users WHERE id = $1 AND role = ANY($2)")
                .bind(user_id)
                .bind(&roles)
                .fetch_optional(pool)
                .await?;
        Ok(found.is_some())
    }

    /// Resolve a privilege snapshot for one user.
    ///
    /// Runs the predicates concurrently. Any failure logs and returns
    /// [`RoleFlags::Denied`]; an unknown user resolves as an unprivileged
    /// officer.
    pub async fn resolve_flags(pool: &PgPool, user_id: DbId) -> RoleFlags {
        let (admin, in_charge) = tokio::join!(
            Self::is_admin(pool, user_id),
            Self::is_in_charge(pool, user_id)
        );
        match (admin, in_charge) {
            (Ok(is_admin), Ok(is_in_charge)) => RoleFlags::Resolved {
                is_admin,
                is_in_charge,
            },
            (admin, in_charge) => {
                let err = admin.err().or(in_charge.err());
                tracing::warn!(
                    %user_id,
                    error = %err.map(|e| e.to_string()).unwrap_or_default(),
                    "Role resolution failed, denying privilege"
                );
                RoleFlags::Denied
            }
        }
    }
}
