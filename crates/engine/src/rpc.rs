// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named backend functions and their response shapes

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use fm_core::ProjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CALCULATE_NEXT_ACTION_AT: &str = "calculateNextActionAt";
pub const CALCULATE_LEAD_SCORE: &str = "calculateLeadScore";
pub const CONVERT_LEAD_TO_PROJECT: &str = "convertLeadToProject";
pub const GET_ANALYTICS_DASHBOARD_DATA: &str = "getAnalyticsDashboardData";
pub const GET_ANALYTICS_TRENDS: &str = "getAnalyticsTrends";
pub const CHECK_ANALYTICS_ALERTS: &str = "checkAnalyticsAlerts";

/// Pull a named field out of an object response, or take a bare value
fn field<'a>(data: &'a Value, names: &[&str]) -> &'a Value {
    match data {
        Value::Object(map) => names
            .iter()
            .find_map(|name| map.get(*name))
            .unwrap_or(&Value::Null),
        other => other,
    }
}

/// Deadline from `calculateNextActionAt`; null or blank means no deadline
pub fn parse_next_action_at(data: &Value) -> Result<Option<DateTime<Utc>>, EngineError> {
    match field(data, &["nextActionAt", "next_action_at"]) {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| EngineError::unexpected(CALCULATE_NEXT_ACTION_AT, format!("{:?}: {}", s, e))),
        other => Err(EngineError::unexpected(
            CALCULATE_NEXT_ACTION_AT,
            format!("expected a timestamp, got {}", other),
        )),
    }
}

/// Score from `calculateLeadScore`, which must be an integer in 0-100
pub fn parse_score(data: &Value) -> Result<u8, EngineError> {
    let value = field(data, &["score"]);
    let score = value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| {
            EngineError::unexpected(CALCULATE_LEAD_SCORE, format!("expected a score, got {}", data))
        })?;
    u8::try_from(score)
        .ok()
        .filter(|s| *s <= 100)
        .ok_or_else(|| {
            EngineError::unexpected(CALCULATE_LEAD_SCORE, format!("score {} is outside 0-100", score))
        })
}

/// Project id from `convertLeadToProject`: a bare number or an object
/// carrying `projectId`/`project_id`
pub fn parse_project_id(data: &Value) -> Result<ProjectId, EngineError> {
    let value = field(data, &["projectId", "project_id", "id"]);
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0).map(ProjectId).ok_or_else(|| {
        EngineError::unexpected(
            CONVERT_LEAD_TO_PROJECT,
            format!("expected a project id, got {}", data),
        )
    })
}

/// An alert raised by `checkAnalyticsAlerts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default = "default_severity")]
    pub severity: String,
    #[serde(default, alias = "type")]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

fn default_severity() -> String {
    "info".to_string()
}

/// Alerts arrive as a bare list or under `alerts`
pub fn parse_alerts(data: &Value) -> Result<Vec<Alert>, EngineError> {
    let list = match field(data, &["alerts"]) {
        Value::Null => return Ok(Vec::new()),
        list => list,
    };
    let alerts: Vec<Alert> = serde_json::from_value(list.clone())
        .map_err(|e| EngineError::unexpected(CHECK_ANALYTICS_ALERTS, e.to_string()))?;
    Ok(alerts
        .into_iter()
        .map(|mut alert| {
            alert.severity = alert.severity.trim().to_lowercase();
            if alert.severity.is_empty() {
                alert.severity = default_severity();
            }
            alert
        })
        .collect())
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
