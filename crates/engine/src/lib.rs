// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Foreman lead pipeline engine

mod activity;
mod alerts;
mod analytics;
mod documents;
mod error;
mod intake;
mod pipeline;
pub mod records;
pub mod rpc;
mod transition;

#[cfg(test)]
mod test_helpers;

pub use activity::FlushReport;
pub use alerts::{AlertPoller, PollOutcome, PollStats};
pub use error::EngineError;
pub use pipeline::{EngineConfig, LeadPipeline, PipelineDeps};
pub use rpc::Alert;
pub use transition::{AuditStatus, TransitionOutcome};
