// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable outbox for audit activities
//!
//! When a status change reaches the store but its STATUS_CHANGE activity
//! does not, the activity is parked here until a flush delivers it.

use crate::op::OutboxOp;
use crate::state::{OutboxState, PendingAudit};
use crate::wal::{Wal, WalError};
use fm_core::{NewActivity, RecordId};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutboxError {
    #[error(transparent)]
    Wal(#[from] WalError),
    #[error("no pending outbox entry {0}")]
    UnknownEntry(String),
}

/// WAL-backed outbox with its replayed state
pub struct Outbox {
    wal: Wal,
    state: OutboxState,
}

impl Outbox {
    /// Open or create the outbox log and replay it
    pub fn open(path: &Path) -> Result<Self, OutboxError> {
        let ops = Wal::replay(path)?;
        let state = OutboxState::from_ops(&ops);
        let wal = Wal::open(path)?;
        Ok(Self { wal, state })
    }

    /// Replay the log without opening it for writing
    pub fn load(path: &Path) -> Result<OutboxState, OutboxError> {
        let ops = Wal::replay(path)?;
        Ok(OutboxState::from_ops(&ops))
    }

    pub fn pending(&self) -> &[PendingAudit] {
        self.state.pending()
    }

    pub fn path(&self) -> &Path {
        self.wal.path()
    }

    /// Park an activity that failed to reach the store
    pub fn defer(
        &mut self,
        entry_id: impl Into<String>,
        activity: NewActivity,
        error: impl Into<String>,
    ) -> Result<(), OutboxError> {
        let op = OutboxOp::Deferred {
            entry_id: entry_id.into(),
            activity,
            error: error.into(),
        };
        self.record(op)
    }

    /// Record that a pending entry reached the store
    pub fn mark_delivered(
        &mut self,
        entry_id: &str,
        activity_id: RecordId,
    ) -> Result<(), OutboxError> {
        if self.state.get(entry_id).is_none() {
            return Err(OutboxError::UnknownEntry(entry_id.to_string()));
        }
        self.record(OutboxOp::Delivered {
            entry_id: entry_id.to_string(),
            activity_id,
        })
    }

    /// Rewrite the log keeping only pending entries
    pub fn compact(&mut self) -> Result<(), OutboxError> {
        let snapshot = self.state.snapshot();
        self.wal.rewrite(&snapshot)?;
        self.state = OutboxState::from_ops(&snapshot);
        Ok(())
    }

    fn record(&mut self, op: OutboxOp) -> Result<(), OutboxError> {
        // Log first so the state never holds what the file lacks
        self.wal.append(&op)?;
        self.state.apply(&op);
        Ok(())
    }
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
