// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lead intake and scoring

use crate::error::EngineError;
use crate::pipeline::LeadPipeline;
use crate::rpc;
use fm_adapters::{Gateway, NotifyAdapter};
use fm_core::{Clock, Event, IdGen, Lead, LeadDraft, LeadId, Stage};
use serde_json::json;

impl<G, N, C, I> LeadPipeline<G, N, C, I>
where
    G: Gateway,
    N: NotifyAdapter,
    C: Clock,
    I: IdGen,
{
    /// Create a lead from the intake form
    ///
    /// Invalid drafts are rejected before any gateway call. Scoring is best
    /// effort: a lead whose score could not be computed keeps score 0.
    pub async fn create(&self, draft: &LeadDraft) -> Result<Lead, EngineError> {
        draft.validate()?;

        match self.create_record(draft).await {
            Ok(lead) => {
                self.emit(Event::LeadCreated {
                    id: lead.id,
                    contact_name: lead.contact_name.clone(),
                })
                .await;
                Ok(lead)
            }
            Err(e) => {
                self.emit(Event::LeadCreateFailed {
                    contact_name: draft.contact_name.trim().to_string(),
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    async fn create_record(&self, draft: &LeadDraft) -> Result<Lead, EngineError> {
        let now = self.clock.now();
        let data = self
            .gateway
            .run(rpc::CALCULATE_NEXT_ACTION_AT, vec![json!(Stage::New.as_str())])
            .await?;
        let next_action_at = rpc::parse_next_action_at(&data)?;

        let record = draft.to_record(next_action_at, now);
        let id = LeadId(
            self.gateway
                .table_create(self.config.tables.leads, serde_json::to_value(&record)?)
                .await?,
        );
        tracing::info!(lead_id = %id, "lead created");

        let mut lead = record.into_lead(id);
        match self.score(id).await {
            Ok(score) => lead.score = score,
            Err(e) => tracing::warn!(lead_id = %id, error = %e, "scoring failed, keeping score 0"),
        }

        self.refresh(lead.clone()).await;
        Ok(self.cached(id).unwrap_or(lead))
    }

    /// Recompute a lead's score and persist it
    pub async fn rescore(&self, id: LeadId) -> Result<u8, EngineError> {
        let lead = self.lead(id).await?;
        let score = self.score(id).await?;
        self.emit(Event::LeadRescored { id, score }).await;
        self.refresh(Lead {
            score,
            updated_at: self.clock.now(),
            ..lead
        })
        .await;
        Ok(score)
    }

    async fn score(&self, id: LeadId) -> Result<u8, EngineError> {
        let data = self
            .gateway
            .run(rpc::CALCULATE_LEAD_SCORE, vec![json!(id)])
            .await?;
        let score = rpc::parse_score(&data)?;
        self.gateway
            .table_update(
                self.config.tables.leads,
                json!({
                    "id": id,
                    "score": score,
                    "updated_at": self.clock.now().to_rfc3339(),
                }),
            )
            .await?;
        Ok(score)
    }
}

#[cfg(test)]
#[path = "intake_tests.rs"]
mod tests;
