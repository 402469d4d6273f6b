// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SLA evaluator
//!
//! Classifies how urgent a lead's next action is. The result depends on the
//! current time, so callers evaluate it on every read and never cache it.

use crate::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Urgency band for a lead's next action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaBand {
    Overdue,
    Critical,
    Warning,
    Good,
}

impl SlaBand {
    pub fn as_str(self) -> &'static str {
        match self {
            SlaBand::Overdue => "overdue",
            SlaBand::Critical => "critical",
            SlaBand::Warning => "warning",
            SlaBand::Good => "good",
        }
    }

    /// Badge text; `Good` shows no badge
    pub fn badge(self) -> Option<&'static str> {
        match self {
            SlaBand::Overdue => Some("Overdue"),
            SlaBand::Critical => Some("Due soon"),
            SlaBand::Warning => Some("Due today"),
            SlaBand::Good => None,
        }
    }
}

impl fmt::Display for SlaBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SlaBand {
    type Err = crate::stage::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overdue" => Ok(SlaBand::Overdue),
            "critical" => Ok(SlaBand::Critical),
            "warning" => Ok(SlaBand::Warning),
            "good" => Ok(SlaBand::Good),
            _ => Err(crate::stage::ParseError::new("sla band", s)),
        }
    }
}

/// Band boundaries: due within `critical_within` is critical, within
/// `warning_within` is a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlaThresholds {
    #[serde(with = "humantime_serde")]
    pub critical_within: Duration,
    #[serde(with = "humantime_serde")]
    pub warning_within: Duration,
}

impl Default for SlaThresholds {
    fn default() -> Self {
        Self {
            critical_within: Duration::from_secs(6 * 3600),
            warning_within: Duration::from_secs(12 * 3600),
        }
    }
}

impl SlaThresholds {
    pub fn is_valid(&self) -> bool {
        self.critical_within < self.warning_within
    }
}

/// Evaluate with the default 6h/12h thresholds
pub fn evaluate(
    next_action_at: Option<DateTime<Utc>>,
    status: Stage,
    now: DateTime<Utc>,
) -> Option<SlaBand> {
    evaluate_with(next_action_at, status, now, &SlaThresholds::default())
}

pub fn evaluate_with(
    next_action_at: Option<DateTime<Utc>>,
    status: Stage,
    now: DateTime<Utc>,
    thresholds: &SlaThresholds,
) -> Option<SlaBand> {
    if status.is_terminal() {
        return None;
    }
    let due = next_action_at?;
    if due < now {
        return Some(SlaBand::Overdue);
    }

    let until_ms = (due - now).num_milliseconds();
    if until_ms < millis(thresholds.critical_within) {
        Some(SlaBand::Critical)
    } else if until_ms < millis(thresholds.warning_within) {
        Some(SlaBand::Warning)
    } else {
        Some(SlaBand::Good)
    }
}

fn millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "sla_tests.rs"]
mod tests;
