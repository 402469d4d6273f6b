// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::*;
use chrono::Duration;
use fm_adapters::{GatewayError, GatewayOp};
use fm_core::{LeadSource, NotifyUrgency, ValidationError};
use serde_json::Value;

fn draft() -> LeadDraft {
    LeadDraft {
        email: Some("ada@example.com".to_string()),
        company: Some("  Lovelace Builders ".to_string()),
        budget_min: Some(30_000.0),
        budget_max: Some(50_000.0),
        lead_source: LeadSource::Referral,
        ..LeadDraft::new("Ada Lovelace")
    }
}

#[tokio::test]
async fn create_stores_new_lead_with_deadline_and_score() {
    let h = harness();
    let due = epoch() + Duration::hours(4);
    h.next_action(due);
    h.gateway.set_rpc(rpc::CALCULATE_LEAD_SCORE, json!({"score": 82}));

    let lead = h.pipeline.create(&draft()).await.unwrap();

    assert_eq!(lead.status, Stage::New);
    assert_eq!(lead.score, 82);
    assert_eq!(lead.next_action_at, Some(due));
    assert_eq!(lead.company.as_deref(), Some("Lovelace Builders"));
    assert_eq!(lead.lead_source, LeadSource::Referral);
    assert!(!lead.is_converted());

    assert_eq!(
        h.gateway.rpc_calls(rpc::CALCULATE_NEXT_ACTION_AT),
        vec![vec![json!("NEW")]]
    );
    assert_eq!(
        h.gateway.rpc_calls(rpc::CALCULATE_LEAD_SCORE),
        vec![vec![json!(lead.id)]]
    );

    let row = h.gateway.row(LEADS, lead.id.0).unwrap();
    assert_eq!(row["status"], "NEW");
    assert_eq!(row["score"], 82);
    assert_eq!(h.pipeline.cached(lead.id), Some(lead));
}

#[tokio::test]
async fn inverted_budget_is_rejected_before_any_gateway_call() {
    let h = harness();
    let draft = LeadDraft {
        budget_min: Some(50_000.0),
        budget_max: Some(30_000.0),
        ..LeadDraft::new("Grace Hopper")
    };

    let err = h.pipeline.create(&draft).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::BudgetRange { .. })
    ));
    assert!(err.is_rejection());
    assert!(h.gateway.calls().is_empty());
    assert!(h.gateway.rows(LEADS).is_empty());
    assert!(h.notify.calls().is_empty());
}

#[tokio::test]
async fn blank_contact_name_is_rejected() {
    let h = harness();
    let err = h.pipeline.create(&LeadDraft::new("   ")).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::MissingContactName)
    ));
    assert!(h.gateway.calls().is_empty());
}

#[tokio::test]
async fn scoring_failure_keeps_lead_with_zero_score() {
    let h = harness();
    h.next_action(epoch() + Duration::hours(4));
    h.gateway.push_rpc(
        rpc::CALCULATE_LEAD_SCORE,
        Err(GatewayError::Remote("model unavailable".to_string())),
    );

    let lead = h.pipeline.create(&draft()).await.unwrap();
    assert_eq!(lead.score, 0);
    assert_eq!(h.gateway.rows(LEADS).len(), 1);
    assert!(h.notify.on_channel("lead:create_failed").is_empty());
}

#[tokio::test]
async fn deadline_failure_aborts_create() {
    let h = harness();
    h.gateway.push_rpc(
        rpc::CALCULATE_NEXT_ACTION_AT,
        Err(GatewayError::Transport("connection refused".to_string())),
    );

    assert!(h.pipeline.create(&draft()).await.is_err());
    assert!(h.gateway.rows(LEADS).is_empty());

    let failures = h.notify.on_channel("lead:create_failed");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].urgency, NotifyUrgency::Important);
    assert!(failures[0].message.contains("Ada Lovelace"));
    assert!(failures[0].message.contains("connection refused"));
}

#[tokio::test]
async fn store_failure_aborts_create() {
    let h = harness();
    h.next_action(epoch() + Duration::hours(4));
    h.gateway.fail(
        GatewayOp::TableCreate,
        GatewayError::Remote("duplicate email".to_string()),
    );

    let err = h.pipeline.create(&draft()).await.unwrap_err();
    assert!(matches!(err, EngineError::Gateway(GatewayError::Remote(_))));
    assert!(h.gateway.rpc_calls(rpc::CALCULATE_LEAD_SCORE).is_empty());
    assert_eq!(h.notify.on_channel("lead:create_failed").len(), 1);
}

#[tokio::test]
async fn rescore_persists_new_score() {
    let h = harness();
    h.seed(lead_row(3, Stage::Qualifying));
    h.gateway.set_rpc(rpc::CALCULATE_LEAD_SCORE, json!(91));

    let score = h.pipeline.rescore(LeadId(3)).await.unwrap();

    assert_eq!(score, 91);
    assert_eq!(h.gateway.row(LEADS, 3).unwrap()["score"], 91);
    assert_eq!(h.pipeline.cached(LeadId(3)).unwrap().score, 91);
}

#[tokio::test]
async fn rescore_rejects_out_of_range_score() {
    let h = harness();
    h.seed(lead_row(3, Stage::Qualifying));
    h.gateway.set_rpc(rpc::CALCULATE_LEAD_SCORE, json!(140));

    let err = h.pipeline.rescore(LeadId(3)).await.unwrap_err();
    assert!(matches!(err, EngineError::UnexpectedResponse { .. }));
    assert_eq!(h.gateway.row(LEADS, 3).unwrap()["score"], Value::from(50));
}

#[tokio::test]
async fn rescore_unknown_lead_is_not_found() {
    let h = harness();
    let err = h.pipeline.rescore(LeadId(404)).await.unwrap_err();
    assert!(matches!(err, EngineError::LeadNotFound(LeadId(404))));
    assert!(h.gateway.rpc_calls(rpc::CALCULATE_LEAD_SCORE).is_empty());
}

#[tokio::test]
async fn rescore_with_failed_reload_updates_cached_score() {
    let h = harness();
    h.seed(lead_row(3, Stage::Qualifying));
    h.pipeline.reload().await.unwrap();
    h.gateway.set_rpc(rpc::CALCULATE_LEAD_SCORE, json!(64));
    h.gateway.fail(
        GatewayOp::TablePage,
        GatewayError::Transport("connection reset".to_string()),
    );

    assert_eq!(h.pipeline.rescore(LeadId(3)).await.unwrap(), 64);
    assert_eq!(h.pipeline.cached(LeadId(3)).unwrap().score, 64);
}
