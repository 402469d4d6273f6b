// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests

use crate::{EngineConfig, LeadPipeline, PipelineDeps};
use chrono::{DateTime, Duration, TimeZone, Utc};
use fm_adapters::{FakeGateway, FakeNotifyAdapter};
use fm_core::config::TablesConfig;
use fm_core::{FakeClock, NotifyConfig, SequentialIdGen, SlaThresholds, Stage, TableId};
use fm_storage::Outbox;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const LEADS: TableId = TableId(10);
pub const ACTIVITIES: TableId = TableId(11);
pub const DOCUMENTS: TableId = TableId(12);
pub const ACTOR: i64 = 7;

pub type TestPipeline = LeadPipeline<FakeGateway, FakeNotifyAdapter, FakeClock, SequentialIdGen>;

pub struct Harness {
    pub pipeline: TestPipeline,
    pub gateway: FakeGateway,
    pub notify: FakeNotifyAdapter,
    pub clock: FakeClock,
    pub outbox: Arc<Mutex<Outbox>>,
    _dir: TempDir,
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

pub fn config() -> EngineConfig {
    EngineConfig {
        tables: TablesConfig {
            leads: LEADS,
            activities: ACTIVITIES,
            documents: Some(DOCUMENTS),
        },
        actor_id: Some(ACTOR),
        sla: SlaThresholds::default(),
        // Small pages so reloads exercise paging
        page_size: 2,
        notify: NotifyConfig::default(),
    }
}

pub fn harness() -> Harness {
    harness_with(config())
}

pub fn harness_with(config: EngineConfig) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let outbox = Arc::new(Mutex::new(
        Outbox::open(&dir.path().join("outbox.wal")).unwrap(),
    ));
    let gateway = FakeGateway::new();
    let notify = FakeNotifyAdapter::new();
    let clock = FakeClock::at(epoch());

    let pipeline = LeadPipeline::new(
        PipelineDeps {
            gateway: gateway.clone(),
            notify: notify.clone(),
            outbox: Some(Arc::clone(&outbox)),
        },
        clock.clone(),
        SequentialIdGen::new("audit"),
        config,
    );

    Harness {
        pipeline,
        gateway,
        notify,
        clock,
        outbox,
        _dir: dir,
    }
}

/// A store row for a lead in `status`
pub fn lead_row(id: i64, status: Stage) -> Value {
    json!({
        "id": id,
        "contact_name": format!("Contact {}", id),
        "email": format!("contact{}@example.com", id),
        "lead_source": "WEBSITE",
        "status": status.as_str(),
        "score": 50,
        "next_action_at": null,
        "converted_project_id": 0,
        "created_at": (epoch() - Duration::days(3)).to_rfc3339(),
        "updated_at": (epoch() - Duration::days(1)).to_rfc3339(),
    })
}

impl Harness {
    pub fn seed(&self, row: Value) {
        self.gateway.insert(LEADS, row);
    }

    /// Answer `calculateNextActionAt` with `due`
    pub fn next_action(&self, due: DateTime<Utc>) {
        self.gateway
            .set_rpc(crate::rpc::CALCULATE_NEXT_ACTION_AT, json!(due.to_rfc3339()));
    }

    pub fn activities(&self) -> Vec<Value> {
        self.gateway.rows(ACTIVITIES)
    }
}
