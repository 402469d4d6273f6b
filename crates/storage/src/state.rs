// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use crate::op::OutboxOp;
use fm_core::NewActivity;
use serde::Serialize;

/// An audit activity still waiting for the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingAudit {
    pub entry_id: String,
    pub activity: NewActivity,
    /// Error from the most recent failed write
    pub error: String,
}

/// Materialized state built from WAL operations
#[derive(Debug, Default)]
pub struct OutboxState {
    /// Pending entries in the order they were deferred
    pending: Vec<PendingAudit>,
    delivered: u64,
}

impl OutboxState {
    pub fn from_ops<'a>(ops: impl IntoIterator<Item = &'a OutboxOp>) -> Self {
        let mut state = Self::default();
        for op in ops {
            state.apply(op);
        }
        state
    }

    pub fn pending(&self) -> &[PendingAudit] {
        &self.pending
    }

    pub fn get(&self, entry_id: &str) -> Option<&PendingAudit> {
        self.pending.iter().find(|p| p.entry_id == entry_id)
    }

    /// Entries delivered since the log was last compacted
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Operations that reproduce the pending set
    pub fn snapshot(&self) -> Vec<OutboxOp> {
        self.pending
            .iter()
            .map(|p| OutboxOp::Deferred {
                entry_id: p.entry_id.clone(),
                activity: p.activity.clone(),
                error: p.error.clone(),
            })
            .collect()
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &OutboxOp) {
        match op {
            OutboxOp::Deferred {
                entry_id,
                activity,
                error,
            } => {
                // Re-deferring an entry records the latest error
                if let Some(existing) = self.pending.iter_mut().find(|p| &p.entry_id == entry_id) {
                    existing.error = error.clone();
                } else {
                    self.pending.push(PendingAudit {
                        entry_id: entry_id.clone(),
                        activity: activity.clone(),
                        error: error.clone(),
                    });
                }
            }

            OutboxOp::Delivered { entry_id, .. } => {
                let before = self.pending.len();
                self.pending.retain(|p| &p.entry_id != entry_id);
                if self.pending.len() < before {
                    self.delivered += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
