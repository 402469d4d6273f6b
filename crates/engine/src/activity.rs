// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity log and audit outbox flushing

use crate::error::EngineError;
use crate::pipeline::LeadPipeline;
use crate::records;
use fm_adapters::{Gateway, NotifyAdapter};
use fm_core::{Activity, ActivityDraft, Clock, Event, Filter, IdGen, LeadId};
use fm_storage::PendingAudit;
use serde::Serialize;

/// Result of replaying the audit outbox
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    /// Entry ids that reached the store
    pub delivered: Vec<String>,
    /// Entry ids still pending, with the error from this attempt
    pub failed: Vec<(String, String)>,
}

impl<G, N, C, I> LeadPipeline<G, N, C, I>
where
    G: Gateway,
    N: NotifyAdapter,
    C: Clock,
    I: IdGen,
{
    /// Log a manual NOTE, CALL, EMAIL or TASK entry
    pub async fn log_activity(
        &self,
        lead_id: LeadId,
        draft: &ActivityDraft,
    ) -> Result<Activity, EngineError> {
        draft.validate()?;
        self.lead(lead_id).await?;

        let record = draft.to_record(lead_id, self.config.actor_id, self.clock.now());
        let id = self
            .gateway
            .table_create(self.config.tables.activities, serde_json::to_value(&record)?)
            .await?;

        self.emit(Event::ActivityLogged {
            lead_id,
            kind: record.activity_type.to_string(),
        })
        .await;
        Ok(record.into_activity(id))
    }

    /// Activities of a lead, newest first
    pub async fn activities(&self, lead_id: LeadId) -> Result<Vec<Activity>, EngineError> {
        let rows = self
            .fetch_all(
                self.config.tables.activities,
                vec![Filter::equals("lead_id", lead_id.0)],
                "created_at",
                false,
            )
            .await?;
        let mut activities = records::decode_all(rows, records::decode_activity);
        activities.retain(|a| a.lead_id == lead_id);
        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(activities)
    }

    /// Audit activities waiting in the outbox
    pub fn pending_audits(&self) -> Result<Vec<PendingAudit>, EngineError> {
        let outbox = self.outbox.as_ref().ok_or(EngineError::OutboxNotConfigured)?;
        let pending = outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pending()
            .to_vec();
        Ok(pending)
    }

    /// Re-send every deferred audit activity
    ///
    /// Delivered entries are marked in the outbox; failures stay pending
    /// with their latest error. The log is compacted once nothing is left.
    pub async fn flush_outbox(&self) -> Result<FlushReport, EngineError> {
        let outbox = self.outbox.as_ref().ok_or(EngineError::OutboxNotConfigured)?;
        let pending = self.pending_audits()?;
        let mut report = FlushReport::default();

        for entry in pending {
            let result = match serde_json::to_value(&entry.activity) {
                Ok(record) => self
                    .gateway
                    .table_create(self.config.tables.activities, record)
                    .await
                    .map_err(EngineError::from),
                Err(e) => Err(e.into()),
            };

            match result {
                Ok(activity_id) => {
                    outbox
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .mark_delivered(&entry.entry_id, activity_id)?;
                    tracing::info!(entry_id = %entry.entry_id, activity_id, "audit entry delivered");
                    report.delivered.push(entry.entry_id);
                }
                Err(e) => {
                    let error = e.to_string();
                    outbox
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .defer(entry.entry_id.clone(), entry.activity, error.clone())?;
                    tracing::warn!(entry_id = %entry.entry_id, error = %error, "audit entry still pending");
                    report.failed.push((entry.entry_id, error));
                }
            }
        }

        let mut outbox = outbox.lock().unwrap_or_else(|e| e.into_inner());
        if outbox.pending().is_empty() && !report.delivered.is_empty() {
            outbox.compact()?;
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
