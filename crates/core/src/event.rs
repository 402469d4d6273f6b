// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline events
//!
//! Every engine operation reports what happened as an [`Event`]. Events are
//! logged and, when a configured [`EventPattern`] matches their name,
//! forwarded to the notifier.

use crate::lead::{LeadId, ProjectId};
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Something that happened in the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    LeadCreated {
        id: LeadId,
        contact_name: String,
    },
    LeadCreateFailed {
        contact_name: String,
        error: String,
    },
    LeadTransitioned {
        id: LeadId,
        from: Stage,
        to: Stage,
    },
    LeadTransitionFailed {
        id: LeadId,
        to: Stage,
        error: String,
    },
    AuditDeferred {
        id: LeadId,
        entry_id: String,
        error: String,
    },
    LeadConverted {
        id: LeadId,
        project_id: ProjectId,
    },
    LeadConvertFailed {
        id: LeadId,
        error: String,
    },
    LeadRescored {
        id: LeadId,
        score: u8,
    },
    ActivityLogged {
        lead_id: LeadId,
        kind: String,
    },
    DocumentAttached {
        lead_id: LeadId,
        file_id: String,
    },
    Alert {
        severity: String,
        title: String,
        message: String,
    },
    AlertCheckFailed {
        error: String,
    },
}

impl Event {
    pub fn name(&self) -> String {
        match self {
            Event::LeadCreated { .. } => "lead:created".to_string(),
            Event::LeadCreateFailed { .. } => "lead:create_failed".to_string(),
            Event::LeadTransitioned { .. } => "lead:transitioned".to_string(),
            Event::LeadTransitionFailed { .. } => "lead:transition_failed".to_string(),
            Event::AuditDeferred { .. } => "audit:deferred".to_string(),
            Event::LeadConverted { .. } => "lead:converted".to_string(),
            Event::LeadConvertFailed { .. } => "lead:convert_failed".to_string(),
            Event::LeadRescored { .. } => "lead:rescored".to_string(),
            Event::ActivityLogged { .. } => "activity:logged".to_string(),
            Event::DocumentAttached { .. } => "document:attached".to_string(),
            Event::Alert { severity, .. } => format!("alert:{}", severity),
            Event::AlertCheckFailed { .. } => "alert:check_failed".to_string(),
        }
    }

    /// One-line human message
    pub fn message(&self) -> String {
        match self {
            Event::LeadCreated { id, contact_name } => {
                format!("Lead {} created for {}", id, contact_name)
            }
            Event::LeadCreateFailed {
                contact_name,
                error,
            } => format!("Could not create lead for {}: {}", contact_name, error),
            Event::LeadTransitioned { id, from, to } => {
                format!("Lead {} moved from {} to {}", id, from.label(), to.label())
            }
            Event::LeadTransitionFailed { id, to, error } => {
                format!("Could not move lead {} to {}: {}", id, to.label(), error)
            }
            Event::AuditDeferred {
                id,
                entry_id,
                error,
            } => format!(
                "Status change for lead {} saved, audit entry {} deferred: {}",
                id, entry_id, error
            ),
            Event::LeadConverted { id, project_id } => {
                format!("Lead {} converted to project {}", id, project_id)
            }
            Event::LeadConvertFailed { id, error } => {
                format!("Could not convert lead {}: {}", id, error)
            }
            Event::LeadRescored { id, score } => format!("Lead {} scored {}", id, score),
            Event::ActivityLogged { lead_id, kind } => {
                format!("{} logged on lead {}", kind, lead_id)
            }
            Event::DocumentAttached { lead_id, file_id } => {
                format!("File {} attached to lead {}", file_id, lead_id)
            }
            Event::Alert { title, message, .. } => format!("{}: {}", title, message),
            Event::AlertCheckFailed { error } => format!("Alert check failed: {}", error),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::LeadCreateFailed { .. }
                | Event::LeadTransitionFailed { .. }
                | Event::AuditDeferred { .. }
                | Event::LeadConvertFailed { .. }
                | Event::AlertCheckFailed { .. }
        )
    }
}

/// Event name pattern: `:`-separated segments, `*` matches one segment,
/// `**` matches the rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    pub fn matches(&self, event_name: &str) -> bool {
        if self.0.is_empty() {
            return false;
        }
        if self.0 == "*" || self.0 == "**" {
            return true;
        }

        let pattern_parts: Vec<&str> = self.0.split(':').collect();
        let event_parts: Vec<&str> = event_name.split(':').collect();
        Self::match_segments(&pattern_parts, &event_parts)
    }

    fn match_segments(pattern: &[&str], event: &[&str]) -> bool {
        match (pattern.first(), event.first()) {
            (None, None) => true,
            (Some(&"**"), _) => true,
            (Some(&"*"), Some(_)) => Self::match_segments(&pattern[1..], &event[1..]),
            (Some(p), Some(e)) if *p == *e => Self::match_segments(&pattern[1..], &event[1..]),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
