// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline board command

use crate::adapters::Pipeline;
use crate::error::FmError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use fm_core::Board;
use std::fmt::Write;

pub async fn show(pipeline: &Pipeline, format: OutputFormat) -> Result<()> {
    pipeline.reload().await.map_err(FmError::from)?;
    let board = pipeline.board();
    output::print(&board, format, |board| render(board, pipeline))
}

fn render(board: &Board, pipeline: &Pipeline) -> String {
    let mut out = String::new();
    for column in &board.columns {
        let _ = writeln!(
            out,
            "{} ({}) {}",
            column.stage.label(),
            column.count(),
            output::money(column.value)
        );
        for lead in &column.leads {
            let band = pipeline.sla(lead);
            let _ = writeln!(
                out,
                "  #{:<6} {:<24} score {:>3}  {}",
                lead.id.0,
                output::truncate(&lead.contact_name, 24),
                lead.score,
                output::badge(band)
            );
        }
    }

    let kpis = &board.kpis;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Leads: {} total, {} open ({})",
        kpis.total,
        kpis.open,
        output::money(kpis.open_value)
    );
    let _ = writeln!(
        out,
        "Closed: {} won, {} lost, win rate {}",
        kpis.won,
        kpis.lost,
        kpis.win_rate
            .map(|r| format!("{:.0}%", r * 100.0))
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(
        out,
        "Average score {}, {} overdue, {} converted",
        kpis.average_score
            .map(|s| format!("{:.0}", s))
            .unwrap_or_else(|| "-".to_string()),
        kpis.overdue,
        kpis.converted
    );
    out
}
