// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoding store rows into domain records
//!
//! Rows are parsed on read: unknown stages or sources, out-of-range scores
//! and converted leads that are not WON never reach the cache.

use fm_core::{Activity, Lead};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed {kind} row {id}: {source}")]
    Malformed {
        kind: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invariant(#[from] fm_core::InvariantError),
}

fn row_id(row: &Value) -> String {
    match row.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => "?".to_string(),
    }
}

fn decode<T: DeserializeOwned>(kind: &'static str, row: Value) -> Result<T, RecordError> {
    let id = row_id(&row);
    serde_json::from_value(row).map_err(|source| RecordError::Malformed { kind, id, source })
}

pub fn decode_lead(row: Value) -> Result<Lead, RecordError> {
    let lead: Lead = decode("lead", row)?;
    lead.validate()?;
    Ok(lead)
}

pub fn decode_activity(row: Value) -> Result<Activity, RecordError> {
    decode("activity", row)
}

/// Decode every valid row, logging and skipping the rest
pub fn decode_all<T>(rows: Vec<Value>, decode: fn(Value) -> Result<T, RecordError>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match decode(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping invalid row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
