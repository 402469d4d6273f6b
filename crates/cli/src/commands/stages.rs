// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Offline commands: the transition table and the SLA evaluator

use crate::output::{self, OutputFormat};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use fm_core::sla;
use fm_core::{Clock, SlaBand, SlaThresholds, Stage, SystemClock};
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize)]
struct StageRow {
    stage: Stage,
    label: &'static str,
    terminal: bool,
    next: &'static [Stage],
}

pub fn stages(format: OutputFormat) -> Result<()> {
    let rows: Vec<StageRow> = Stage::ALL
        .iter()
        .map(|&stage| StageRow {
            stage,
            label: stage.label(),
            terminal: stage.is_terminal(),
            next: stage.allowed_next(),
        })
        .collect();

    output::print(&rows, format, |rows| {
        let mut out = format!("{:<15} {:<15} NEXT\n", "STAGE", "LABEL");
        for row in rows {
            let next = if row.terminal {
                "(terminal)".to_string()
            } else {
                row.next
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let _ = writeln!(out, "{:<15} {:<15} {}", row.stage.as_str(), row.label, next);
        }
        out
    })
}

#[derive(Args)]
pub struct SlaArgs {
    /// Lead status
    #[arg(long)]
    pub status: Stage,
    /// Next action deadline (RFC 3339)
    #[arg(long)]
    pub next_action_at: Option<DateTime<Utc>>,
    /// Evaluate at this instant instead of now (RFC 3339)
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct SlaView {
    status: Stage,
    next_action_at: Option<DateTime<Utc>>,
    at: DateTime<Utc>,
    band: Option<SlaBand>,
}

pub fn sla(args: &SlaArgs, thresholds: &SlaThresholds, format: OutputFormat) -> Result<()> {
    let at = args.at.unwrap_or_else(|| SystemClock.now());
    let view = SlaView {
        status: args.status,
        next_action_at: args.next_action_at,
        at,
        band: sla::evaluate_with(args.next_action_at, args.status, at, thresholds),
    };

    output::print(&view, format, |view| match view.band {
        Some(band) => match band.badge() {
            Some(badge) => format!("{} ({})", band, badge),
            None => band.to_string(),
        },
        None => "none".to_string(),
    })
}
