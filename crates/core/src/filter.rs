// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lead list filtering
//!
//! Criteria the store can evaluate are pushed down as gateway filters; the
//! free-text search and SLA band are applied locally, since the band depends
//! on the current time.

use crate::lead::{Lead, LeadSource};
use crate::query::{Filter, FilterOp};
use crate::sla::{SlaBand, SlaThresholds};
use crate::stage::Stage;
use chrono::{DateTime, Utc};

/// Predicate chain over leads; every present criterion must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    pub search: Option<String>,
    pub stages: Vec<Stage>,
    pub sources: Vec<LeadSource>,
    pub owner_id: Option<i64>,
    pub sla: Option<SlaBand>,
}

impl LeadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = Some(text).filter(|t| !t.trim().is_empty());
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn source(mut self, source: LeadSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn owner(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn sla(mut self, band: SlaBand) -> Self {
        self.sla = Some(band);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Filters the store can apply. Only single-valued criteria are pushed
    /// down; multi-valued ones are checked locally by [`LeadFilter::matches`].
    pub fn gateway_filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if let [stage] = self.stages.as_slice() {
            filters.push(Filter::equals("status", stage.as_str()));
        }
        if let [source] = self.sources.as_slice() {
            filters.push(Filter::equals("lead_source", source.as_str()));
        }
        if let Some(owner) = self.owner_id {
            filters.push(Filter::new("owner_id", FilterOp::Equal, owner));
        }
        filters
    }

    pub fn matches(&self, lead: &Lead, now: DateTime<Utc>, thresholds: &SlaThresholds) -> bool {
        self.matches_search(lead)
            && (self.stages.is_empty() || self.stages.contains(&lead.status))
            && (self.sources.is_empty() || self.sources.contains(&lead.lead_source))
            && self.owner_id.is_none_or(|owner| lead.owner_id == Some(owner))
            && self
                .sla
                .is_none_or(|band| lead.sla(now, thresholds) == Some(band))
    }

    fn matches_search(&self, lead: &Lead) -> bool {
        let Some(needle) = self.search.as_deref() else {
            return true;
        };
        let needle = needle.trim().to_lowercase();
        std::iter::once(Some(lead.contact_name.as_str()))
            .chain([
                lead.company.as_deref(),
                lead.email.as_deref(),
                lead.phone.as_deref(),
                lead.project_type.as_deref(),
            ])
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Apply the filter, preserving order
    pub fn apply<'a>(
        &self,
        leads: &'a [Lead],
        now: DateTime<Utc>,
        thresholds: &SlaThresholds,
    ) -> Vec<&'a Lead> {
        leads
            .iter()
            .filter(|lead| self.matches(lead, now, thresholds))
            .collect()
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
