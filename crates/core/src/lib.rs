// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! fm-core: Domain model for the Foreman lead pipeline
//!
//! This crate provides:
//! - The pipeline stage set and its transition table
//! - Lead, activity and intake records with parse-on-read validation
//! - The SLA urgency evaluator
//! - Lead filtering and Kanban board KPIs
//! - Gateway query types, events and configuration

pub mod clock;
pub mod config;
pub mod id;
pub mod query;
mod wire;

// Domain (order matters for dependencies)
pub mod stage;
pub mod sla;
pub mod lead;
pub mod activity;
pub mod document;
pub mod filter;
pub mod board;
pub mod event;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use activity::{Activity, ActivityDraft, ActivityType, NewActivity};
pub use board::{Board, Column, Kpis};
pub use document::{Document, NewDocument};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    Config, ConfigError, Notification, NotifyConfig, NotifyRule, NotifyUrgency,
};
pub use event::{Event, EventPattern};
pub use filter::LeadFilter;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use lead::{
    InvariantError, Lead, LeadDraft, LeadId, LeadSource, NewLead, ProjectId, ValidationError,
};
pub use query::{Filter, FilterOp, Page, PageQuery, RecordId, TableId};
pub use sla::{SlaBand, SlaThresholds};
pub use stage::{ParseError, Stage, TransitionError};
