// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic alert polling
//!
//! At most one alert check is in flight at a time. A tick that arrives while
//! a check is still running is skipped rather than queued.

use crate::error::EngineError;
use crate::pipeline::LeadPipeline;
use crate::rpc::Alert;
use fm_adapters::{Gateway, NotifyAdapter};
use fm_core::{Clock, IdGen};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Checked(Vec<Alert>),
    /// Another check was still running
    Skipped,
}

/// Counters from a polling run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub checked: u64,
    /// Ticks that found a check from another `poll_once` caller in flight
    pub skipped: u64,
    pub failed: u64,
    pub alerts: u64,
}

/// Single-flight alert poller
pub struct AlertPoller<G, N, C: Clock, I: IdGen> {
    pipeline: Arc<LeadPipeline<G, N, C, I>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the check ends, even on error
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<G, N, C, I> AlertPoller<G, N, C, I>
where
    G: Gateway,
    N: NotifyAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn new(pipeline: Arc<LeadPipeline<G, N, C, I>>) -> Self {
        Self {
            pipeline,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_polling(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one check unless one is already running
    pub async fn poll_once(&self) -> Result<PollOutcome, EngineError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("alert check still running, skipping");
            return Ok(PollOutcome::Skipped);
        }
        let _guard = InFlight(&self.in_flight);

        let alerts = self.pipeline.check_alerts().await?;
        Ok(PollOutcome::Checked(alerts))
    }

    /// Poll every `interval` until `shutdown` resolves
    ///
    /// The first check runs immediately. Missed ticks are dropped. A check
    /// still running at shutdown is abandoned.
    pub async fn run(&self, interval: Duration, shutdown: impl Future<Output = ()>) -> PollStats {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut stats = PollStats::default();
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }
            let result = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown during alert check, abandoning it");
                    break;
                }
                result = self.poll_once() => result,
            };
            match result {
                Ok(PollOutcome::Checked(alerts)) => {
                    stats.checked += 1;
                    stats.alerts += alerts.len() as u64;
                    tracing::info!(alerts = alerts.len(), "alert check complete");
                }
                Ok(PollOutcome::Skipped) => stats.skipped += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(error = %e, "alert check failed");
                }
            }
        }
        tracing::info!(
            checked = stats.checked,
            skipped = stats.skipped,
            failed = stats.failed,
            "alert polling stopped"
        );
        stats
    }
}

#[cfg(test)]
#[path = "alerts_tests.rs"]
mod tests;
