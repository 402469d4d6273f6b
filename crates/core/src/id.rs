// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local id generation
//!
//! Store records get their ids from the gateway. Ids minted here only name
//! outbox entries, so they carry a prefix saying what they belong to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// Random ids: `<prefix>-<32 hex digits>`
#[derive(Debug, Clone)]
pub struct UuidIdGen {
    prefix: String,
}

impl UuidIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        format!("{}-{}", self.prefix, uuid::Uuid::new_v4().simple())
    }
}

/// Counting ids: `<prefix>-1`, `<prefix>-2`, ... shared across clones
#[derive(Debug, Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
