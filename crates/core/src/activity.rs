// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lead activity (audit trail) records

use crate::lead::{LeadId, ValidationError};
use crate::stage::{normalize_token, ParseError, Stage};
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of activity entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActivityType {
    Note,
    Call,
    Email,
    StatusChange,
    Task,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Note => "NOTE",
            ActivityType::Call => "CALL",
            ActivityType::Email => "EMAIL",
            ActivityType::StatusChange => "STATUS_CHANGE",
            ActivityType::Task => "TASK",
        }
    }

    /// Whether a user may log this kind by hand
    pub fn is_manual(self) -> bool {
        !matches!(self, ActivityType::StatusChange)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "NOTE" => Ok(ActivityType::Note),
            "CALL" => Ok(ActivityType::Call),
            "EMAIL" => Ok(ActivityType::Email),
            "STATUS_CHANGE" => Ok(ActivityType::StatusChange),
            "TASK" => Ok(ActivityType::Task),
            _ => Err(ParseError::new("activity type", s)),
        }
    }
}

impl TryFrom<String> for ActivityType {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ActivityType> for String {
    fn from(kind: ActivityType) -> Self {
        kind.as_str().to_string()
    }
}

/// An activity as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub lead_id: LeadId,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub activity_type: ActivityType,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub old_value: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub new_value: Option<String>,
    #[serde(default, with = "wire::optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Record body sent to the store when appending an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub lead_id: LeadId,
    pub user_id: Option<i64>,
    pub activity_type: ActivityType,
    pub title: String,
    pub description: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    #[serde(with = "wire::optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewActivity {
    /// Audit entry for a stage move
    pub fn status_change(
        lead_id: LeadId,
        user_id: Option<i64>,
        from: Stage,
        to: Stage,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            lead_id,
            user_id,
            activity_type: ActivityType::StatusChange,
            title: format!("Status changed from {} to {}", from.label(), to.label()),
            description: None,
            old_value: Some(from.as_str().to_string()),
            new_value: Some(to.as_str().to_string()),
            completed_at: Some(now),
            created_at: now,
        }
    }
}

impl NewActivity {
    pub fn into_activity(self, id: i64) -> Activity {
        Activity {
            id,
            lead_id: self.lead_id,
            user_id: self.user_id,
            activity_type: self.activity_type,
            title: self.title,
            description: self.description,
            old_value: self.old_value,
            new_value: self.new_value,
            completed_at: self.completed_at,
            created_at: self.created_at,
        }
    }
}

/// A manually entered activity
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    pub kind: ActivityType,
    pub title: String,
    pub description: Option<String>,
}

impl ActivityDraft {
    pub fn new(kind: ActivityType, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.kind.is_manual() {
            return Err(ValidationError::ReservedActivityType(self.kind));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        Ok(())
    }

    pub fn to_record(&self, lead_id: LeadId, user_id: Option<i64>, now: DateTime<Utc>) -> NewActivity {
        NewActivity {
            lead_id,
            user_id,
            activity_type: self.kind,
            title: self.title.trim().to_string(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            old_value: None,
            new_value: None,
            completed_at: Some(now),
            created_at: now,
        }
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
