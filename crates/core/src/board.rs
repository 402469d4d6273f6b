// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline board: leads grouped by stage, plus derived KPIs

use crate::lead::Lead;
use crate::sla::{SlaBand, SlaThresholds};
use crate::stage::Stage;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One board column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub stage: Stage,
    pub leads: Vec<Lead>,
    pub value: f64,
}

impl Column {
    pub fn count(&self) -> usize {
        self.leads.len()
    }
}

/// Aggregate pipeline metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total: usize,
    pub open: usize,
    pub open_value: f64,
    pub won: usize,
    pub lost: usize,
    /// `won / (won + lost)`; `None` until a lead has closed
    pub win_rate: Option<f64>,
    pub average_score: Option<f64>,
    pub overdue: usize,
    pub converted: usize,
}

/// Leads grouped by stage in pipeline order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
    pub kpis: Kpis,
}

impl Board {
    pub fn build(leads: &[Lead], now: DateTime<Utc>, thresholds: &SlaThresholds) -> Self {
        let columns = Stage::ALL
            .into_iter()
            .map(|stage| {
                let leads: Vec<Lead> = leads.iter().filter(|l| l.status == stage).cloned().collect();
                let value = leads.iter().map(Lead::pipeline_value).sum();
                Column { stage, leads, value }
            })
            .collect();

        Self {
            columns,
            kpis: Kpis::compute(leads, now, thresholds),
        }
    }

    pub fn column(&self, stage: Stage) -> Option<&Column> {
        self.columns.iter().find(|c| c.stage == stage)
    }
}

impl Kpis {
    pub fn compute(leads: &[Lead], now: DateTime<Utc>, thresholds: &SlaThresholds) -> Self {
        let kpis = leads.iter().fold(Kpis::default(), |mut k, lead| {
            k.total += 1;
            match lead.status {
                Stage::Won => k.won += 1,
                Stage::Lost => k.lost += 1,
                _ => {
                    k.open += 1;
                    k.open_value += lead.pipeline_value();
                }
            }
            if lead.sla(now, thresholds) == Some(SlaBand::Overdue) {
                k.overdue += 1;
            }
            if lead.is_converted() {
                k.converted += 1;
            }
            k
        });

        let closed = kpis.won + kpis.lost;
        let score_sum: u64 = leads.iter().map(|l| u64::from(l.score)).sum();
        Kpis {
            win_rate: (closed > 0).then(|| kpis.won as f64 / closed as f64),
            average_score: (kpis.total > 0).then(|| score_sum as f64 / kpis.total as f64),
            ..kpis
        }
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
