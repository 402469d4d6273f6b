// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fm-storage: Local durable state for the pipeline engine

mod op;
mod outbox;
mod state;
mod wal;

pub use op::OutboxOp;
pub use outbox::{Outbox, OutboxError};
pub use state::{OutboxState, PendingAudit};
pub use wal::{Wal, WalError};
