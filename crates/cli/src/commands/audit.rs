// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred audit entry commands

use crate::adapters::Pipeline;
use crate::error::FmError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::fmt::Write;

#[derive(Args)]
pub struct AuditArgs {
    #[command(subcommand)]
    pub command: AuditCommand,
}

#[derive(Subcommand)]
pub enum AuditCommand {
    /// List status change entries waiting in the outbox
    Pending,
    /// Re-send every waiting entry
    Flush,
}

pub async fn handle(args: AuditArgs, pipeline: &Pipeline, format: OutputFormat) -> Result<()> {
    match args.command {
        AuditCommand::Pending => {
            let pending = pipeline.pending_audits().map_err(FmError::from)?;
            output::print(&pending, format, |pending| {
                if pending.is_empty() {
                    return "No deferred audit entries".to_string();
                }
                let mut out = String::new();
                for entry in pending {
                    let _ = writeln!(
                        out,
                        "{}  lead {}  {} -> {}  ({})",
                        entry.entry_id,
                        entry.activity.lead_id,
                        entry.activity.old_value.as_deref().unwrap_or("-"),
                        entry.activity.new_value.as_deref().unwrap_or("-"),
                        entry.error
                    );
                }
                out
            })
        }
        AuditCommand::Flush => {
            let report = pipeline.flush_outbox().await.map_err(FmError::from)?;
            output::print(&report, format, |report| {
                let mut out = format!(
                    "Delivered {}, still pending {}\n",
                    report.delivered.len(),
                    report.failed.len()
                );
                for (entry_id, error) in &report.failed {
                    let _ = writeln!(out, "  {}: {}", entry_id, error);
                }
                out
            })
        }
    }
}
