//! Complaint status constants and field validation.
//!
//! Defines the valid complaint statuses and the validation helpers applied
//! to submission drafts and edit patches before anything is written. The
//! same rules run in the API layer and, where expressible, again as SQL
//! predicates in the repository layer.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status for a newly submitted complaint.
pub const STATUS_OPEN: &str = "open";
/// A supervisor has picked the complaint up.
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// The underlying issue has been addressed.
pub const STATUS_RESOLVED: &str = "resolved";

/// All valid complaint statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_OPEN, STATUS_IN_PROGRESS, STATUS_RESOLVED];

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

pub const MAX_PNR_LENGTH: usize = 20;
pub const MAX_CUSTOMER_NAME_LENGTH: usize = 120;
pub const MAX_BERTH_LENGTH: usize = 20;
pub const MIN_ISSUE_DESCRIPTION_LENGTH: usize = 10;
pub const MAX_ISSUE_DESCRIPTION_LENGTH: usize = 2000;
pub const MIN_ACTION_PLAN_LENGTH: usize = 3;
pub const MAX_ACTION_PLAN_LENGTH: usize = 1000;
pub const MIN_CONTACT_DIGITS: usize = 10;
pub const MAX_CONTACT_DIGITS: usize = 15;

// ---------------------------------------------------------------------------
// Status validation
// ---------------------------------------------------------------------------

/// Validate that a status string is one of the known statuses.
///
/// Any status may transition to any other; only *who* may change the status
/// is restricted (see [`crate::permission`]).
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid complaint status '{}'. Must be one of: {:?}",
            status, VALID_STATUSES
        )))
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

fn require_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), CoreError> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(CoreError::Validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn validate_pnr(pnr: &str) -> Result<(), CoreError> {
    require_length("pnr_number", pnr, 1, MAX_PNR_LENGTH)
}

pub fn validate_customer_name(name: &str) -> Result<(), CoreError> {
    require_length("customer_name", name, 1, MAX_CUSTOMER_NAME_LENGTH)
}

pub fn validate_berth(berth: &str) -> Result<(), CoreError> {
    require_length("berth_number", berth, 1, MAX_BERTH_LENGTH)
}

pub fn validate_issue_description(description: &str) -> Result<(), CoreError> {
    require_length(
        "issue_description",
        description,
        MIN_ISSUE_DESCRIPTION_LENGTH,
        MAX_ISSUE_DESCRIPTION_LENGTH,
    )
}

pub fn validate_action_plan(plan: &str) -> Result<(), CoreError> {
    require_length(
        "action_plan",
        plan,
        MIN_ACTION_PLAN_LENGTH,
        MAX_ACTION_PLAN_LENGTH,
    )
}

// ---------------------------------------------------------------------------
// Contact number normalization
// ---------------------------------------------------------------------------

fn non_digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\D").expect("static regex"))
}

/// Normalize an optional contact number to bare digits.
///
/// Strips every non-digit character. Returns `Ok(None)` when the input is
/// missing or blank, `Ok(Some(digits))` when the remaining digits number
/// 10 to 15, and a validation error otherwise.
pub fn normalize_contact_number(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let digits = non_digit_re().replace_all(raw.trim(), "").into_owned();
    if digits.is_empty() {
        return Ok(None);
    }
    if digits.len() < MIN_CONTACT_DIGITS || digits.len() > MAX_CONTACT_DIGITS {
        return Err(CoreError::Validation(format!(
            "contact_number should be {MIN_CONTACT_DIGITS}-{MAX_CONTACT_DIGITS} digits"
        )));
    }
    Ok(Some(digits))
}

/// Normalize an optional free-text note: blank becomes `None`.
pub fn normalize_optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_statuses() {
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(validate_status("closed").is_err());
        assert!(validate_status("").is_err());
    }

    #[test]
    fn issue_description_minimum_is_ten_characters() {
        assert!(validate_issue_description("123456789").is_err());
        assert!(validate_issue_description("1234567890").is_ok());
    }

    #[test]
    fn issue_description_trims_before_counting() {
        assert!(validate_issue_description("  12345678  ").is_err());
    }

    #[test]
    fn action_plan_minimum_is_three_characters() {
        assert!(validate_action_plan("ok").is_err());
        assert!(validate_action_plan("fix").is_ok());
    }

    #[test]
    fn pnr_rejects_empty_and_overlong() {
        assert!(validate_pnr("").is_err());
        assert!(validate_pnr(&"9".repeat(21)).is_err());
        assert!(validate_pnr("4521036987").is_ok());
    }

    #[test]
    fn contact_number_strips_formatting() {
        let got = normalize_contact_number(Some("+91 98765-43210")).unwrap();
        assert_eq!(got.as_deref(), Some("919876543210"));
    }

    #[test]
    fn contact_number_blank_is_none() {
        assert_eq!(normalize_contact_number(None).unwrap(), None);
        assert_eq!(normalize_contact_number(Some("   ")).unwrap(), None);
        assert_eq!(normalize_contact_number(Some("- -")).unwrap(), None);
    }

    #[test]
    fn contact_number_rejects_out_of_range_digit_counts() {
        assert!(normalize_contact_number(Some("123456789")).is_err());
        assert!(normalize_contact_number(Some(&"1".repeat(16))).is_err());
        assert!(normalize_contact_number(Some(&"1".repeat(15))).is_ok());
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" swept coach ")).as_deref(),
            Some("swept coach")
        );
    }
}
