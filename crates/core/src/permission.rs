//! The complaint permission model.
//!
//! Three pure predicates decide everything: content edits, status edits,
//! and deletion. They take the acting user's id, a freshly resolved
//! [`RoleFlags`] snapshot, and the current time; callers must evaluate them
//! against the *current* row, never a cached copy from before the request.

use chrono::Duration;

use crate::complaint::STATUS_RESOLVED;
use crate::types::{DbId, Timestamp};

/// How long after creation the reporting officer may still edit their own
/// complaint. A hard wall-clock cutoff with no grace period.
pub const SELF_EDIT_WINDOW_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// RoleFlags
// ---------------------------------------------------------------------------

/// A per-request privilege snapshot.
///
/// `Denied` is an explicit state, distinct from "resolved as officer", so
/// that an erroring or unfinished role lookup can never default to
/// privileged. Never persist or cache a value of this type across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFlags {
    /// Role resolution failed or has not run; grants nothing.
    Denied,
    /// Role resolution completed.
    Resolved { is_admin: bool, is_in_charge: bool },
}

impl RoleFlags {
    /// The fail-closed default.
    pub const fn denied() -> Self {
        RoleFlags::Denied
    }

    pub const fn officer() -> Self {
        RoleFlags::Resolved {
            is_admin: false,
            is_in_charge: false,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, RoleFlags::Resolved { is_admin: true, .. })
    }

    pub fn is_in_charge(self) -> bool {
        matches!(
            self,
            RoleFlags::Resolved {
                is_in_charge: true,
                ..
            }
        )
    }

    /// The single privilege gate used by the permission predicates.
    pub fn is_admin_or_in_charge(self) -> bool {
        match self {
            RoleFlags::Denied => false,
            RoleFlags::Resolved {
                is_admin,
                is_in_charge,
            } => is_admin || is_in_charge,
        }
    }
}

// ---------------------------------------------------------------------------
// Permission predicates
// ---------------------------------------------------------------------------

/// The slice of a complaint row the permission model looks at.
#[derive(Debug, Clone, Copy)]
pub struct ComplaintRef<'a> {
    pub reporter_user_id: DbId,
    pub status: &'a str,
    pub created_at: Timestamp,
}

/// May `actor` edit the complaint's content fields?
///
/// Privileged actors always may. The reporting officer may only while the
/// complaint is their own, not yet resolved, and younger than
/// [`SELF_EDIT_WINDOW_HOURS`].
pub fn can_edit_content(
    complaint: ComplaintRef<'_>,
    actor: DbId,
    flags: RoleFlags,
    now: Timestamp,
) -> bool {
    if flags.is_admin_or_in_charge() {
        return true;
    }
    complaint.reporter_user_id == actor
        && complaint.status != STATUS_RESOLVED
        && now - complaint.created_at <= Duration::hours(SELF_EDIT_WINDOW_HOURS)
}

/// May `actor` change the complaint's status? Ownership and age are
/// irrelevant; only privilege counts.
pub fn can_edit_status(flags: RoleFlags) -> bool {
    flags.is_admin_or_in_charge()
}

/// May `actor` delete the complaint?
pub fn can_delete(flags: RoleFlags) -> bool {
    flags.is_admin_or_in_charge()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
