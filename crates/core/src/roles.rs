//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_users_table.sql`.

pub const ROLE_OFFICER: &str = "officer";
pub const ROLE_IN_CHARGE: &str = "in_charge";
pub const ROLE_ADMIN: &str = "admin";
