// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::gateway::{FileId, FileUpload, Gateway, GatewayError};
use async_trait::async_trait;
use fm_core::{Page, PageQuery, RecordId, TableId};
use serde_json::Value;
use tracing::Instrument;

/// Wrapper that adds tracing to any Gateway
#[derive(Clone)]
pub struct TracedGateway<G> {
    inner: G,
}

impl<G> TracedGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

fn log_outcome<T>(result: &Result<T, GatewayError>, start: std::time::Instant, done: &str) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(_) => tracing::info!(elapsed_ms, "{}", done),
        Err(e) => tracing::error!(elapsed_ms, error = %e, "failed"),
    }
}

#[async_trait]
impl<G: Gateway> Gateway for TracedGateway<G> {
    async fn table_page(
        &self,
        table: TableId,
        query: &PageQuery,
    ) -> Result<Page<Value>, GatewayError> {
        let span = tracing::info_span!("gateway.table_page", %table, page = query.page);
        async {
            tracing::debug!(
                page_size = query.page_size,
                filters = query.filters.len(),
                "querying"
            );
            let start = std::time::Instant::now();
            let result = self.inner.table_page(table, query).await;
            match &result {
                Ok(page) => tracing::info!(
                    rows = page.items.len(),
                    total = page.total,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "page loaded"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn table_create(&self, table: TableId, record: Value) -> Result<RecordId, GatewayError> {
        let span = tracing::info_span!("gateway.table_create", %table);
        async {
            // Precondition: records are JSON objects
            if !record.is_object() {
                tracing::error!("record is not an object");
                return Err(GatewayError::Remote(format!(
                    "record for table {} must be an object",
                    table
                )));
            }

            let start = std::time::Instant::now();
            let result = self.inner.table_create(table, record).await;
            match &result {
                Ok(id) => tracing::info!(
                    id,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "created"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn table_update(&self, table: TableId, record: Value) -> Result<(), GatewayError> {
        let id = record.get("id").and_then(Value::as_i64);
        let span = tracing::info_span!("gateway.table_update", %table, id);
        async {
            // Precondition: updates name their record
            if id.is_none() {
                tracing::error!("record has no id");
                return Err(GatewayError::Remote(format!(
                    "update on table {} requires an id",
                    table
                )));
            }

            let start = std::time::Instant::now();
            let result = self.inner.table_update(table, record).await;
            log_outcome(&result, start, "updated");
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, path: &str, args: Vec<Value>) -> Result<Value, GatewayError> {
        let span = tracing::info_span!("gateway.run", path);
        async {
            tracing::debug!(args = args.len(), "calling");
            let start = std::time::Instant::now();
            let result = self.inner.run(path, args).await;
            log_outcome(&result, start, "returned");
            result
        }
        .instrument(span)
        .await
    }

    async fn upload(&self, file: FileUpload) -> Result<FileId, GatewayError> {
        let span = tracing::info_span!(
            "gateway.upload",
            file_name = %file.file_name,
            size = file.bytes.len()
        );
        async {
            let start = std::time::Instant::now();
            let result = self.inner.upload(file).await;
            match &result {
                Ok(file_id) => tracing::info!(
                    %file_id,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "uploaded"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
