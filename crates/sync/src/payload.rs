//! The wire shape POSTed to the compliance spreadsheet webhook.

use chrono::FixedOffset;
use serde::Serialize;

use coachlog_core::complaint::STATUS_OPEN;
use coachlog_db::models::complaint::Complaint;

/// Placeholder rendered into spreadsheet cells for absent optional fields.
/// An em-dash reads better in a sheet than an empty cell or "null".
pub const EMPTY_CELL: &str = "\u{2014}";

/// IST offset (+05:30); the receiving sheet is read in Indian Railways
/// operations, so dates are rendered for that zone.
fn ist() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("static offset")
}

/// One spreadsheet row. Field order matches the webhook contract.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SheetsRow {
    pub date: String,
    pub train_number: String,
    pub coach_number: String,
    #[serde(rename = "class")]
    pub coach_class: String,
    pub configuration: String,
    pub unit: String,
    pub position: i32,
    pub capacity: i32,
    pub pnr_number: String,
    pub customer_name: String,
    pub berth_number: String,
    pub contact_number: String,
    pub issue_description: String,
    pub action_plan: String,
    pub action_during_service: String,
    pub action_required_in_yard: String,
    pub status: String,
    pub reporter_name: String,
    pub reporter_staff_number: String,
}

fn cell(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}

impl SheetsRow {
    /// Flatten a complaint row into the webhook payload.
    ///
    /// The creation timestamp is rendered human-readable in IST; optional
    /// textual fields become [`EMPTY_CELL`]; a blank status (should not
    /// happen, but the sheet must stay readable) defaults to `open`.
    pub fn from_complaint(complaint: &Complaint) -> Self {
        let date = complaint
            .created_at
            .with_timezone(&ist())
            .format("%d/%m/%Y, %I:%M:%S %p")
            .to_string();

        let status = if complaint.status.trim().is_empty() {
            STATUS_OPEN.to_string()
        } else {
            complaint.status.clone()
        };

        Self {
            date,
            train_number: complaint.train_number.clone(),
            coach_number: complaint.coach_number.clone(),
            coach_class: complaint.class.clone(),
            configuration: complaint.configuration.clone(),
            unit: complaint.unit.clone(),
            position: complaint.position,
            capacity: complaint.capacity,
            pnr_number: complaint.pnr_number.clone(),
            customer_name: complaint.customer_name.clone(),
            berth_number: complaint.berth_number.clone(),
            contact_number: cell(&complaint.contact_number),
            issue_description: complaint.issue_description.clone(),
            action_plan: complaint.action_plan.clone(),
            action_during_service: cell(&complaint.action_during_service),
            action_required_in_yard: cell(&complaint.action_required_in_yard),
            status,
            reporter_name: complaint.reporter_name.clone(),
            reporter_staff_number: complaint.reporter_staff_number.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn complaint() -> Complaint {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        Complaint {
            id: Uuid::new_v4(),
            reporter_user_id: Uuid::new_v4(),
            reporter_name: "A Sharma".into(),
            reporter_staff_number: "NR1234".into(),
            train_number: "12951".into(),
            coach_number: "B4".into(),
            class: "3AC".into(),
            unit: "U2".into(),
            configuration: "LHB".into(),
            capacity: 72,
            position: 9,
            pnr_number: "4521036987".into(),
            customer_name: "R Gupta".into(),
            berth_number: "32".into(),
            contact_number: None,
            issue_description: "Charging socket broken".into(),
            action_plan: "Replace socket".into(),
            action_during_service: Some("Shifted passenger".into()),
            action_required_in_yard: None,
            status: "open".into(),
            resolved_at: None,
            evidence_paths: vec![],
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn optional_fields_render_as_em_dash() {
        let row = SheetsRow::from_complaint(&complaint());
        assert_eq!(row.contact_number, EMPTY_CELL);
        assert_eq!(row.action_required_in_yard, EMPTY_CELL);
        assert_eq!(row.action_during_service, "Shifted passenger");
    }

    #[test]
    fn date_renders_in_ist() {
        // 08:00 UTC is 13:30 IST.
        let row = SheetsRow::from_complaint(&complaint());
        assert_eq!(row.date, "01/03/2026, 01:30:00 PM");
    }

    #[test]
    fn blank_status_defaults_to_open() {
        let mut c = complaint();
        c.status = String::new();
        let row = SheetsRow::from_complaint(&c);
        assert_eq!(row.status, "open");
    }

    #[test]
    fn class_serializes_under_its_wire_name() {
        let row = SheetsRow::from_complaint(&complaint());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["class"], "3AC");
        assert!(json.get("coach_class").is_none());
        assert_eq!(json["capacity"], 72);
        assert_eq!(json["reporter_staff_number"], "NR1234");
    }

    #[test]
    fn whitespace_only_optionals_still_render_placeholder() {
        let mut c = complaint();
        c.contact_number = Some("   ".into());
        let row = SheetsRow::from_complaint(&c);
        assert_eq!(row.contact_number, EMPTY_CELL);
    }
}
