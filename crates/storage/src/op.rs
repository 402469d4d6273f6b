// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbox operations recorded in the log

use fm_core::{NewActivity, RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboxOp {
    /// An audit activity that could not be written to the store
    Deferred {
        entry_id: String,
        activity: NewActivity,
        error: String,
    },
    /// A deferred activity that has since reached the store
    Delivered {
        entry_id: String,
        activity_id: RecordId,
    },
}

impl OutboxOp {
    pub fn entry_id(&self) -> &str {
        match self {
            OutboxOp::Deferred { entry_id, .. } | OutboxOp::Delivered { entry_id, .. } => entry_id,
        }
    }
}
