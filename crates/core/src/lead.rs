// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lead records and the intake form
//!
//! A [`Lead`] is decoded from the store on every read and checked with
//! [`Lead::validate`]. New leads start life as a [`LeadDraft`], which is
//! validated before anything is sent to the gateway.

use crate::stage::{normalize_token, ParseError, Stage};
use crate::sla::{self, SlaBand, SlaThresholds};
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Store-assigned lead identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub i64);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LeadId {
    fn from(id: i64) -> Self {
        LeadId(id)
    }
}

/// Identifier of the project a lead was converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a lead came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LeadSource {
    Website,
    Referral,
    GoogleAds,
    SocialMedia,
    RepeatCustomer,
    ColdCall,
    TradeShow,
    #[default]
    Other,
}

impl LeadSource {
    pub const ALL: [LeadSource; 8] = [
        LeadSource::Website,
        LeadSource::Referral,
        LeadSource::GoogleAds,
        LeadSource::SocialMedia,
        LeadSource::RepeatCustomer,
        LeadSource::ColdCall,
        LeadSource::TradeShow,
        LeadSource::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadSource::Website => "WEBSITE",
            LeadSource::Referral => "REFERRAL",
            LeadSource::GoogleAds => "GOOGLE_ADS",
            LeadSource::SocialMedia => "SOCIAL_MEDIA",
            LeadSource::RepeatCustomer => "REPEAT_CUSTOMER",
            LeadSource::ColdCall => "COLD_CALL",
            LeadSource::TradeShow => "TRADE_SHOW",
            LeadSource::Other => "OTHER",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadSource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        LeadSource::ALL
            .into_iter()
            .find(|source| source.as_str() == token)
            .ok_or_else(|| ParseError::new("lead source", s))
    }
}

impl TryFrom<String> for LeadSource {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LeadSource> for String {
    fn from(source: LeadSource) -> Self {
        source.as_str().to_string()
    }
}

/// A lead as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub project_type: Option<String>,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub project_description: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub lead_source: LeadSource,
    pub status: Stage,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub score: u8,
    #[serde(default, deserialize_with = "wire::blank_as_none")]
    pub notes: Option<String>,
    #[serde(default, with = "wire::optional_timestamp")]
    pub next_action_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire::project_ref")]
    pub converted_project_id: Option<ProjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored lead that breaks a record invariant
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantError {
    #[error("lead {id} is converted to project {project} but its status is {status}")]
    ConvertedNotWon {
        id: LeadId,
        project: ProjectId,
        status: Stage,
    },
    #[error("lead {id} has score {score}, expected 0-100")]
    ScoreOutOfRange { id: LeadId, score: u8 },
}

impl Lead {
    /// Check invariants that must hold for every stored lead
    pub fn validate(&self) -> Result<(), InvariantError> {
        if let Some(project) = self.converted_project_id {
            if self.status != Stage::Won {
                return Err(InvariantError::ConvertedNotWon {
                    id: self.id,
                    project,
                    status: self.status,
                });
            }
        }
        if self.score > 100 {
            return Err(InvariantError::ScoreOutOfRange {
                id: self.id,
                score: self.score,
            });
        }
        Ok(())
    }

    pub fn is_converted(&self) -> bool {
        self.converted_project_id.is_some()
    }

    /// Expected deal value: the top of the budget range, or the bottom when
    /// only that is known
    pub fn pipeline_value(&self) -> f64 {
        self.budget_max.or(self.budget_min).unwrap_or(0.0)
    }

    /// Urgency band at `now`
    pub fn sla(&self, now: DateTime<Utc>, thresholds: &SlaThresholds) -> Option<SlaBand> {
        sla::evaluate_with(self.next_action_at, self.status, now, thresholds)
    }
}

/// Intake form validation failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("contact name is required")]
    MissingContactName,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("{field} must be a finite number")]
    NonFiniteBudget { field: &'static str },
    #[error("{field} cannot be negative")]
    NegativeBudget { field: &'static str },
    #[error("budget_min ({min}) is greater than budget_max ({max})")]
    BudgetRange { min: f64, max: f64 },
    #[error("activity title is required")]
    MissingTitle,
    #[error("{0} activities are recorded automatically and cannot be logged by hand")]
    ReservedActivityType(crate::activity::ActivityType),
}

/// A lead as entered on the intake form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadDraft {
    pub contact_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub project_type: Option<String>,
    pub project_description: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub lead_source: LeadSource,
    pub owner_id: Option<i64>,
    pub notes: Option<String>,
}

impl LeadDraft {
    pub fn new(contact_name: impl Into<String>) -> Self {
        Self {
            contact_name: contact_name.into(),
            ..Self::default()
        }
    }

    /// Reject drafts that must not reach the store
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.contact_name.trim().is_empty() {
            return Err(ValidationError::MissingContactName);
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !looks_like_email(email) {
                return Err(ValidationError::InvalidEmail(email.to_string()));
            }
        }
        for (field, value) in [("budget_min", self.budget_min), ("budget_max", self.budget_max)] {
            match value {
                Some(v) if !v.is_finite() => {
                    return Err(ValidationError::NonFiniteBudget { field });
                }
                Some(v) if v < 0.0 => return Err(ValidationError::NegativeBudget { field }),
                _ => {}
            }
        }
        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            if min > max {
                return Err(ValidationError::BudgetRange { min, max });
            }
        }
        Ok(())
    }

    /// Build the record to create. Status is always `NEW`.
    pub fn to_record(&self, next_action_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> NewLead {
        NewLead {
            contact_name: self.contact_name.trim().to_string(),
            email: trimmed(&self.email),
            phone: trimmed(&self.phone),
            company: trimmed(&self.company),
            address: trimmed(&self.address),
            project_type: trimmed(&self.project_type),
            project_description: trimmed(&self.project_description),
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            lead_source: self.lead_source,
            status: Stage::New,
            owner_id: self.owner_id,
            score: 0,
            notes: trimmed(&self.notes),
            next_action_at,
            converted_project_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Record body sent to the store when creating a lead
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLead {
    pub contact_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub project_type: Option<String>,
    pub project_description: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub lead_source: LeadSource,
    pub status: Stage,
    pub owner_id: Option<i64>,
    pub score: u8,
    pub notes: Option<String>,
    #[serde(with = "wire::optional_timestamp")]
    pub next_action_at: Option<DateTime<Utc>>,
    #[serde(with = "wire::project_ref")]
    pub converted_project_id: Option<ProjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewLead {
    /// The lead as it reads back once the store assigned `id`
    pub fn into_lead(self, id: LeadId) -> Lead {
        Lead {
            id,
            contact_name: self.contact_name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            address: self.address,
            project_type: self.project_type,
            project_description: self.project_description,
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            lead_source: self.lead_source,
            status: self.status,
            owner_id: self.owner_id,
            score: self.score,
            notes: self.notes,
            next_action_at: self.next_action_at,
            converted_project_id: self.converted_project_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
#[path = "lead_tests.rs"]
mod tests;
