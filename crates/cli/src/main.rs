// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow unwrap in test code
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! fm - Foreman lead pipeline CLI

mod adapters;
mod commands;
mod completions;
mod error;
mod output;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use commands::{alerts, analytics, audit, board, lead, stages};
use completions::CompletionsArgs;
use error::FmError;
use fm_core::{Config, SlaThresholds};
use output::OutputFormat;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Environment variable holding the log filter
const LOG_ENV: &str = "FM_LOG";

#[derive(Parser)]
#[command(
    name = "fm",
    version,
    about = "Foreman - lead pipeline for construction sales teams"
)]
struct Cli {
    /// Config file (default: $FM_CONFIG, then ./foreman.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stage transition table
    Stages,
    /// Evaluate the SLA band for a status and deadline
    Sla(stages::SlaArgs),
    /// Lead management
    Lead(lead::LeadArgs),
    /// Show the pipeline board and KPIs
    Board,
    /// Analytics alerts
    Alerts(alerts::AlertsArgs),
    /// Analytics reports
    Analytics(analytics::AnalyticsArgs),
    /// Status change audit entries waiting to be delivered
    Audit(audit::AuditArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<FmError>() {
                Some(err) => eprint!("{}", err),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.output;

    // Offline commands need no backend
    let command = match cli.command {
        Commands::Stages => return stages::stages(format),
        Commands::Sla(args) => {
            let thresholds = offline_thresholds(cli.config.as_deref())?;
            return stages::sla(&args, &thresholds, format);
        }
        Commands::Completions(args) => {
            completions::generate_completions::<Cli>(args.shell);
            return Ok(());
        }
        command => command,
    };

    let config = load_config(cli.config.as_deref())?;
    let _log_guard = setup_logging(&config)?;
    let pipeline = adapters::make_pipeline(&config)?;

    match command {
        Commands::Lead(args) => lead::handle(args, &pipeline, format).await,
        Commands::Board => board::show(&pipeline, format).await,
        Commands::Alerts(args) => {
            alerts::handle(args, pipeline, config.alerts.poll_interval, format).await
        }
        Commands::Analytics(args) => analytics::handle(args, &pipeline, format).await,
        Commands::Audit(args) => audit::handle(args, &pipeline, format).await,
        Commands::Stages | Commands::Sla(_) | Commands::Completions(_) => Ok(()),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = Config::locate(explicit).map_err(|_| FmError::config_not_found())?;
    Config::load(&path).map_err(|e| FmError::config_invalid(&path, e).into())
}

/// SLA thresholds from the config file when there is one
fn offline_thresholds(explicit: Option<&Path>) -> Result<SlaThresholds> {
    match Config::locate(explicit) {
        Ok(_) => Ok(load_config(explicit)?.sla),
        Err(_) => Ok(SlaThresholds::default()),
    }
}

/// Log to the configured file, or to stderr
fn setup_logging(
    config: &Config,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(path) = &config.log.file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file has no name: {}", path.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(Some(guard))
}
