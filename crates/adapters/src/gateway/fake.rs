// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory gateway for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{FileId, FileUpload, Gateway, GatewayError};
use async_trait::async_trait;
use fm_core::{Page, PageQuery, RecordId, TableId};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    TablePage { table: TableId, query: PageQuery },
    TableCreate { table: TableId, record: Value },
    TableUpdate { table: TableId, record: Value },
    Run { path: String, args: Vec<Value> },
    Upload { file_name: String, size: usize },
}

/// Which gateway operation a failure applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    TablePage,
    TableCreate,
    TableUpdate,
    Upload,
}

#[derive(Default)]
struct FakeState {
    tables: HashMap<TableId, Vec<Value>>,
    next_id: RecordId,
    rpc_defaults: HashMap<String, Value>,
    rpc_queue: HashMap<String, VecDeque<Result<Value, GatewayError>>>,
    failures: HashMap<(GatewayOp, Option<TableId>), GatewayError>,
    uploads: Vec<FileUpload>,
    calls: Vec<GatewayCall>,
}

/// Fake gateway backed by in-memory tables
#[derive(Clone, Default)]
pub struct FakeGateway {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a row as-is. Rows without an `id` get the next free one.
    pub fn insert(&self, table: TableId, mut record: Value) -> RecordId {
        let mut state = self.state();
        let id = match record.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => {
                state.next_id += 1;
                let id = state.next_id;
                record["id"] = Value::from(id);
                id
            }
        };
        state.next_id = state.next_id.max(id);
        state.tables.entry(table).or_default().push(record);
        id
    }

    /// All rows of a table in insertion order
    pub fn rows(&self, table: TableId) -> Vec<Value> {
        self.state().tables.get(&table).cloned().unwrap_or_default()
    }

    pub fn row(&self, table: TableId, id: RecordId) -> Option<Value> {
        self.state()
            .tables
            .get(&table)?
            .iter()
            .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
            .cloned()
    }

    /// Answer every call to `path` with `value`
    pub fn set_rpc(&self, path: &str, value: Value) {
        self.state().rpc_defaults.insert(path.to_string(), value);
    }

    /// Answer the next call to `path` with `result`, ahead of any default
    pub fn push_rpc(&self, path: &str, result: Result<Value, GatewayError>) {
        self.state()
            .rpc_queue
            .entry(path.to_string())
            .or_default()
            .push_back(result);
    }

    /// Fail every `op` call, on any table
    pub fn fail(&self, op: GatewayOp, error: GatewayError) {
        self.state().failures.insert((op, None), error);
    }

    /// Fail every `op` call on `table`
    pub fn fail_table(&self, op: GatewayOp, table: TableId, error: GatewayError) {
        self.state().failures.insert((op, Some(table)), error);
    }

    pub fn clear_failures(&self) {
        self.state().failures.clear();
    }

    pub fn uploads(&self) -> Vec<FileUpload> {
        self.state().uploads.clone()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    /// Recorded `run` calls to `path`, as their argument lists
    pub fn rpc_calls(&self, path: &str) -> Vec<Vec<Value>> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Run { path: p, args } if p == path => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

impl FakeState {
    fn check(&self, op: GatewayOp, table: Option<TableId>) -> Result<(), GatewayError> {
        if let Some(err) = table.and_then(|t| self.failures.get(&(op, Some(t)))) {
            return Err(err.clone());
        }
        match self.failures.get(&(op, None)) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn order(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn table_page(
        &self,
        table: TableId,
        query: &PageQuery,
    ) -> Result<Page<Value>, GatewayError> {
        let mut state = self.state();
        state.calls.push(GatewayCall::TablePage {
            table,
            query: query.clone(),
        });
        state.check(GatewayOp::TablePage, Some(table))?;

        let mut matching: Vec<Value> = state
            .tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        matching.sort_by(|a, b| {
            let ord = order(a, b, &query.order_by);
            if query.ascending {
                ord
            } else {
                ord.reverse()
            }
        });

        let total = matching.len() as u64;
        let size = query.page_size.max(1) as usize;
        let start = (query.page.max(1) as usize - 1) * size;
        let items = matching.into_iter().skip(start).take(size).collect();
        Ok(Page { items, total })
    }

    async fn table_create(&self, table: TableId, record: Value) -> Result<RecordId, GatewayError> {
        {
            let mut state = self.state();
            state.calls.push(GatewayCall::TableCreate {
                table,
                record: record.clone(),
            });
            state.check(GatewayOp::TableCreate, Some(table))?;
        }
        if !record.is_object() {
            return Err(GatewayError::Remote("record must be an object".to_string()));
        }
        let mut record = record;
        if let Some(map) = record.as_object_mut() {
            map.remove("id");
        }
        Ok(self.insert(table, record))
    }

    async fn table_update(&self, table: TableId, record: Value) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.calls.push(GatewayCall::TableUpdate {
            table,
            record: record.clone(),
        });
        state.check(GatewayOp::TableUpdate, Some(table))?;

        let id = record
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| GatewayError::Remote("update requires an id".to_string()))?;
        let row = state
            .tables
            .get_mut(&table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
            })
            .ok_or_else(|| GatewayError::NotFound(format!("table {} id {}", table, id)))?;

        if let (Some(target), Value::Object(fields)) = (row.as_object_mut(), record) {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        Ok(())
    }

    async fn run(&self, path: &str, args: Vec<Value>) -> Result<Value, GatewayError> {
        let mut state = self.state();
        state.calls.push(GatewayCall::Run {
            path: path.to_string(),
            args,
        });
        if let Some(result) = state.rpc_queue.get_mut(path).and_then(VecDeque::pop_front) {
            return result;
        }
        state
            .rpc_defaults
            .get(path)
            .cloned()
            .ok_or_else(|| GatewayError::Remote(format!("no handler for {}", path)))
    }

    async fn upload(&self, file: FileUpload) -> Result<FileId, GatewayError> {
        let mut state = self.state();
        state.calls.push(GatewayCall::Upload {
            file_name: file.file_name.clone(),
            size: file.bytes.len(),
        });
        state.check(GatewayOp::Upload, None)?;
        state.uploads.push(file);
        Ok(FileId(format!("file-{}", state.uploads.len())))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
