// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline factory for CLI commands

use anyhow::{Context, Result};
use fm_adapters::{ConsoleNotifyAdapter, HttpGateway, TracedGateway};
use fm_core::{Config, SystemClock, UuidIdGen};
use fm_engine::{EngineConfig, LeadPipeline, PipelineDeps};
use fm_storage::Outbox;
use std::sync::{Arc, Mutex};

/// The pipeline wired to real adapters
pub type Pipeline =
    LeadPipeline<TracedGateway<HttpGateway>, ConsoleNotifyAdapter, SystemClock, UuidIdGen>;

/// Build a pipeline talking to the configured backend
pub fn make_pipeline(config: &Config) -> Result<Pipeline> {
    let outbox = Outbox::open(&config.outbox.path).with_context(|| {
        format!(
            "failed to open audit outbox {}",
            config.outbox.path.display()
        )
    })?;
    let gateway = TracedGateway::new(HttpGateway::from_config(config));
    tracing::debug!(base_url = gateway.inner().base_url(), "gateway configured");

    Ok(LeadPipeline::new(
        PipelineDeps {
            gateway,
            notify: ConsoleNotifyAdapter::stderr(),
            outbox: Some(Arc::new(Mutex::new(outbox))),
        },
        SystemClock,
        UuidIdGen::new("audit"),
        EngineConfig::from_config(config),
    ))
}
