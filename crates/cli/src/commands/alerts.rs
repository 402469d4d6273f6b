// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analytics alert commands

use crate::adapters::Pipeline;
use crate::error::FmError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, Subcommand};
use fm_adapters::{Gateway, NotifyAdapter};
use fm_core::{Clock, IdGen};
use fm_engine::{Alert, AlertPoller, PollStats};
use serde_json::json;
use std::fmt::Write;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Subcommand)]
pub enum AlertsCommand {
    /// Run one alert check
    Check,
    /// Check for alerts periodically until interrupted
    Watch {
        /// Time between checks (default: [alerts] poll_interval)
        #[arg(long, value_parser = humantime::parse_duration)]
        interval: Option<Duration>,
    },
}

pub async fn handle(
    args: AlertsArgs,
    pipeline: Pipeline,
    default_interval: Duration,
    format: OutputFormat,
) -> Result<()> {
    match args.command {
        AlertsCommand::Check => {
            let alerts = pipeline.check_alerts().await.map_err(FmError::from)?;
            output::print(&alerts, format, |alerts| render(alerts))
        }
        AlertsCommand::Watch { interval } => {
            let interval = interval.unwrap_or(default_interval);
            if interval.is_zero() {
                return Err(FmError::new("Alert interval must be greater than zero").into());
            }
            eprintln!(
                "Checking alerts every {}; press Ctrl-C to stop",
                humantime::format_duration(interval)
            );

            let poller = AlertPoller::new(Arc::new(pipeline));
            let stats = watch(&poller, interval, tokio::signal::ctrl_c()).await?;

            let value = json!({
                "checked": stats.checked,
                "skipped": stats.skipped,
                "failed": stats.failed,
                "alerts": stats.alerts,
            });
            output::print(&value, format, |_| {
                format!(
                    "Stopped after {} checks ({} alerts, {} failed, {} skipped)",
                    stats.checked, stats.alerts, stats.failed, stats.skipped
                )
            })
        }
    }
}

/// Poll until `signal` fires
///
/// A signal listener that cannot be installed stops the watch with an error
/// instead of looking like an interrupt.
async fn watch<G, N, C, I>(
    poller: &AlertPoller<G, N, C, I>,
    interval: Duration,
    signal: impl Future<Output = io::Result<()>>,
) -> Result<PollStats>
where
    G: Gateway,
    N: NotifyAdapter,
    C: Clock,
    I: IdGen,
{
    let mut signal_error = None;
    let stats = poller
        .run(interval, async {
            if let Err(e) = signal.await {
                signal_error = Some(e);
            }
        })
        .await;

    match signal_error {
        Some(e) => Err(FmError::new("Could not listen for Ctrl-C")
            .with_context(format!("alert watch stopped after {} checks", stats.checked))
            .with_source(e)
            .into()),
        None => Ok(stats),
    }
}

fn render(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No alerts".to_string();
    }
    let mut out = String::new();
    for alert in alerts {
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            alert.severity, alert.title, alert.message
        );
    }
    out
}

#[cfg(test)]
#[path = "alerts_tests.rs"]
mod tests;
