// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analytics report commands
//!
//! Report payloads are passed through as JSON in both output modes.

use crate::adapters::Pipeline;
use crate::error::FmError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct AnalyticsArgs {
    #[command(subcommand)]
    pub command: AnalyticsCommand,
}

#[derive(Subcommand)]
pub enum AnalyticsCommand {
    /// Dashboard totals
    Dashboard {
        /// Named date range understood by the backend (e.g. 30d)
        #[arg(long)]
        range: Option<String>,
    },
    /// Time series for one metric
    Trends {
        #[arg(long)]
        metric: String,
        /// Bucket size understood by the backend (e.g. weekly)
        #[arg(long)]
        period: Option<String>,
    },
}

pub async fn handle(args: AnalyticsArgs, pipeline: &Pipeline, format: OutputFormat) -> Result<()> {
    let data = match args.command {
        AnalyticsCommand::Dashboard { range } => pipeline.dashboard(range.as_deref()).await,
        AnalyticsCommand::Trends { metric, period } => {
            pipeline.trends(&metric, period.as_deref()).await
        }
    }
    .map_err(FmError::from)?;

    output::print(&data, format, |data| {
        serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
    })
}
