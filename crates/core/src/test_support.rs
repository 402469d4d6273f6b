// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builders shared by unit tests

use crate::lead::{Lead, LeadId, LeadSource};
use crate::stage::Stage;
use chrono::{DateTime, TimeZone, Utc};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

pub fn make_lead(id: i64, status: Stage) -> Lead {
    Lead {
        id: LeadId(id),
        contact_name: format!("Contact {}", id),
        email: Some(format!("contact{}@example.com", id)),
        phone: None,
        company: None,
        address: None,
        project_type: None,
        project_description: None,
        budget_min: None,
        budget_max: None,
        lead_source: LeadSource::Website,
        status,
        owner_id: None,
        score: 0,
        notes: None,
        next_action_at: None,
        converted_project_id: None,
        created_at: epoch(),
        updated_at: epoch(),
    }
}
