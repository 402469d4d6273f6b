// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lead pipeline: cached lead list plus the operations that move leads
//!
//! The cache is replaced wholesale from the store. Operations that fail
//! leave it untouched; a confirmed write whose reload fails patches the
//! written lead in place so the cache never lags the store.

use crate::error::EngineError;
use crate::records;
use fm_adapters::{Gateway, NotifyAdapter};
use fm_core::config::TablesConfig;
use fm_core::{
    Board, Clock, Config, Event, IdGen, Lead, LeadFilter, LeadId, NotifyConfig, PageQuery,
    SlaBand, SlaThresholds,
};
use fm_storage::Outbox;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Engine settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tables: TablesConfig,
    /// User recorded on activities and conversions
    pub actor_id: Option<i64>,
    pub sla: SlaThresholds,
    pub page_size: u32,
    pub notify: NotifyConfig,
}

impl EngineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tables: config.tables,
            actor_id: config.user.id,
            sla: config.sla,
            page_size: config.pipeline.page_size,
            notify: config.notify.clone(),
        }
    }
}

/// Engine adapter dependencies
pub struct PipelineDeps<G, N> {
    pub gateway: G,
    pub notify: N,
    /// Parking place for audit activities the store rejected
    pub outbox: Option<Arc<Mutex<Outbox>>>,
}

/// Lead pipeline over an injected gateway
pub struct LeadPipeline<G, N, C: Clock, I: IdGen> {
    pub(crate) gateway: G,
    notify: N,
    pub(crate) clock: C,
    pub(crate) id_gen: I,
    pub(crate) config: EngineConfig,
    pub(crate) outbox: Option<Arc<Mutex<Outbox>>>,
    leads: Mutex<Vec<Lead>>,
}

impl<G, N, C, I> LeadPipeline<G, N, C, I>
where
    G: Gateway,
    N: NotifyAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn new(deps: PipelineDeps<G, N>, clock: C, id_gen: I, config: EngineConfig) -> Self {
        Self {
            gateway: deps.gateway,
            notify: deps.notify,
            clock,
            id_gen,
            config,
            outbox: deps.outbox,
            leads: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the cache with every lead in the store
    pub async fn reload(&self) -> Result<usize, EngineError> {
        let rows = self.fetch_all(self.config.tables.leads, Vec::new(), "id", true).await?;
        let leads = records::decode_all(rows, records::decode_lead);
        let count = leads.len();
        *self.leads.lock().unwrap_or_else(|e| e.into_inner()) = leads;
        tracing::debug!(count, "lead cache reloaded");
        Ok(count)
    }

    /// Snapshot of the cached leads
    pub fn leads(&self) -> Vec<Lead> {
        self.leads.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn cached(&self, id: LeadId) -> Option<Lead> {
        self.leads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|lead| lead.id == id)
            .cloned()
    }

    /// Cached lead, reloading once if it is not cached yet
    pub async fn lead(&self, id: LeadId) -> Result<Lead, EngineError> {
        if let Some(lead) = self.cached(id) {
            return Ok(lead);
        }
        self.reload().await?;
        self.cached(id).ok_or(EngineError::LeadNotFound(id))
    }

    /// Urgency band of a lead right now
    pub fn sla(&self, lead: &Lead) -> Option<SlaBand> {
        lead.sla(self.clock.now(), &self.config.sla)
    }

    /// Leads matching `filter`, straight from the store
    ///
    /// Stage, source and owner criteria are pushed down to the gateway; the
    /// rest is applied locally. The cache is not touched.
    pub async fn search(&self, filter: &LeadFilter) -> Result<Vec<Lead>, EngineError> {
        let rows = self
            .fetch_all(self.config.tables.leads, filter.gateway_filters(), "id", true)
            .await?;
        let leads = records::decode_all(rows, records::decode_lead);
        let now = self.clock.now();
        Ok(filter
            .apply(&leads, now, &self.config.sla)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Kanban board over the cached leads
    pub fn board(&self) -> Board {
        Board::build(&self.leads(), self.clock.now(), &self.config.sla)
    }

    /// Read every page of a table
    pub(crate) async fn fetch_all(
        &self,
        table: fm_core::TableId,
        filters: Vec<fm_core::Filter>,
        order_by: &str,
        ascending: bool,
    ) -> Result<Vec<Value>, EngineError> {
        let mut rows = Vec::new();
        let mut page = 1;
        loop {
            let query = PageQuery::new(self.config.page_size)
                .page(page)
                .order_by(order_by, ascending)
                .filters(filters.iter().cloned());
            let result = self.gateway.table_page(table, &query).await?;
            let more = result.has_more(&query) && !result.items.is_empty();
            rows.extend(result.items);
            if !more {
                break;
            }
            page += 1;
        }
        Ok(rows)
    }

    /// Log an event and forward it to the notifier when configured
    pub(crate) async fn emit(&self, event: Event) {
        if event.is_failure() {
            tracing::warn!(event = %event.name(), "{}", event.message());
        } else {
            tracing::info!(event = %event.name(), "{}", event.message());
        }

        if let Some(notification) = self.config.notify.to_notification(&event) {
            if let Err(e) = self.notify.send(&notification).await {
                tracing::warn!(error = %e, channel = %notification.channel, "notification failed");
            }
        }
    }

    /// Reload after a write the store already confirmed
    ///
    /// `written` is the lead as it now stands in the store. If the reload
    /// fails it replaces the cached copy, or is added when not cached.
    pub(crate) async fn refresh(&self, written: Lead) {
        let Err(e) = self.reload().await else {
            return;
        };
        tracing::warn!(lead_id = %written.id, error = %e, "reload after write failed, patching cached lead");
        let mut leads = self.leads.lock().unwrap_or_else(|e| e.into_inner());
        match leads.iter_mut().find(|lead| lead.id == written.id) {
            Some(cached) => *cached = written,
            None => leads.push(written),
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
