// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::gateway::{FakeGateway, GatewayCall};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[tokio::test]
async fn traced_create_rejects_non_object_record() {
    let fake = FakeGateway::new();
    let traced = TracedGateway::new(fake.clone());

    let err = traced
        .table_create(TableId(1), json!([1, 2]))
        .await
        .unwrap_err();

    assert!(
        err.to_string().contains("must be an object"),
        "Expected object precondition, got: {}",
        err
    );
    assert!(fake.calls().is_empty(), "inner gateway must not be called");
}

#[tokio::test]
async fn traced_update_requires_id() {
    let fake = FakeGateway::new();
    let traced = TracedGateway::new(fake.clone());

    let err = traced
        .table_update(TableId(1), json!({"status": "WON"}))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("requires an id"), "got: {}", err);
    assert!(fake.calls().is_empty());
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_run_logs_span_and_timing() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeGateway::new();
        fake.set_rpc("calculateNextActionAt", json!("2026-06-02T09:00:00Z"));
        let traced = TracedGateway::new(fake);

        traced
            .run("calculateNextActionAt", vec![json!("CONTACTED")])
            .await
    });

    assert!(result.is_ok(), "run should succeed: {:?}", result);
    assert!(
        logs.contains("gateway.run"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("calculateNextActionAt"),
        "Should log rpc path. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("returned"),
        "Should log completion. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("elapsed_ms"),
        "Should log timing. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_run_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedGateway::new(FakeGateway::new());
        traced.run("checkAnalyticsAlerts", Vec::new()).await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("no handler for checkAnalyticsAlerts"),
        "Should log error. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_page_logs_row_counts() {
    let (logs, _) = with_tracing(|| async {
        let fake = FakeGateway::new();
        fake.insert(TableId(7), json!({"status": "NEW"}));
        let traced = TracedGateway::new(fake);
        traced.table_page(TableId(7), &PageQuery::new(50)).await
    });

    assert!(logs.contains("gateway.table_page"), "Logs:\n{}", logs);
    assert!(logs.contains("page loaded"), "Logs:\n{}", logs);
    assert!(logs.contains("rows=1"), "Logs:\n{}", logs);
}

// =============================================================================
// Delegation tests - verify traced wrapper delegates to inner adapter
// =============================================================================

#[tokio::test]
async fn traced_gateway_delegates_update_to_inner() {
    let fake = FakeGateway::new();
    let id = fake.insert(TableId(1), json!({"status": "NEW"}));
    let traced = TracedGateway::new(fake.clone());

    traced
        .table_update(TableId(1), json!({"id": id, "status": "CONTACTED"}))
        .await
        .unwrap();

    match &fake.calls()[0] {
        GatewayCall::TableUpdate { table, record } => {
            assert_eq!(*table, TableId(1));
            assert_eq!(record["status"], "CONTACTED");
        }
        other => panic!("Expected TableUpdate call, got {:?}", other),
    }
    assert_eq!(fake.row(TableId(1), id).unwrap()["status"], "CONTACTED");
}

#[tokio::test]
async fn traced_gateway_delegates_upload_to_inner() {
    let fake = FakeGateway::new();
    let traced = TracedGateway::new(fake.clone());

    let id = traced
        .upload(FileUpload::new("site.jpg", vec![0; 16]))
        .await
        .unwrap();

    assert_eq!(id.0, "file-1");
    assert_eq!(traced.inner().uploads().len(), 1);
}
