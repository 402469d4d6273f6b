// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fm_core::{ActivityType, LeadId, ProjectId, Stage};
use serde_json::json;

fn lead_row(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "contact_name": "Dana Wells",
        "email": "dana@wells.test",
        "phone": "",
        "lead_source": "referral",
        "status": status,
        "score": 64,
        "next_action_at": "",
        "converted_project_id": 0,
        "created_at": "2026-05-01T08:00:00Z",
        "updated_at": "2026-05-02T08:00:00Z"
    })
}

#[test]
fn decodes_valid_lead() {
    let lead = decode_lead(lead_row(5, "ESTIMATE_SENT")).unwrap();
    assert_eq!(lead.id, LeadId(5));
    assert_eq!(lead.status, Stage::EstimateSent);
    assert_eq!(lead.phone, None);
    assert_eq!(lead.next_action_at, None);
    assert_eq!(lead.converted_project_id, None);
}

#[test]
fn unknown_stage_is_malformed() {
    let err = decode_lead(lead_row(6, "ON_HOLD")).unwrap_err();
    assert!(matches!(err, RecordError::Malformed { kind: "lead", .. }));
    assert!(err.to_string().contains("row 6"));
}

#[test]
fn converted_open_lead_breaks_invariant() {
    let mut row = lead_row(7, "NEGOTIATING");
    row["converted_project_id"] = json!(40);
    let err = decode_lead(row).unwrap_err();
    assert!(matches!(err, RecordError::Invariant(_)));

    let mut row = lead_row(8, "WON");
    row["converted_project_id"] = json!(40);
    assert_eq!(
        decode_lead(row).unwrap().converted_project_id,
        Some(ProjectId(40))
    );
}

#[test]
fn decode_all_skips_bad_rows() {
    let rows = vec![lead_row(1, "NEW"), lead_row(2, "MAYBE"), lead_row(3, "LOST")];
    let leads = decode_all(rows, decode_lead);
    let ids: Vec<LeadId> = leads.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![LeadId(1), LeadId(3)]);
}

#[test]
fn decodes_activity_row() {
    let activity = decode_activity(json!({
        "id": 90,
        "lead_id": 5,
        "user_id": 2,
        "activity_type": "STATUS_CHANGE",
        "title": "Status changed from New to Contacted",
        "old_value": "NEW",
        "new_value": "CONTACTED",
        "completed_at": "2026-05-03T10:00:00Z",
        "created_at": "2026-05-03T10:00:00Z"
    }))
    .unwrap();
    assert_eq!(activity.activity_type, ActivityType::StatusChange);
    assert_eq!(activity.new_value.as_deref(), Some("CONTACTED"));
}
