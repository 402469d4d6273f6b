// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage transitions and lead conversion

use crate::error::EngineError;
use crate::pipeline::LeadPipeline;
use crate::rpc;
use chrono::{DateTime, Utc};
use fm_adapters::{Gateway, NotifyAdapter};
use fm_core::{Clock, Event, IdGen, Lead, LeadId, NewActivity, ProjectId, RecordId, Stage};
use serde::Serialize;
use serde_json::json;

/// What happened to the STATUS_CHANGE activity of a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditStatus {
    /// Written to the store
    Recorded { activity_id: RecordId },
    /// Parked in the local outbox for a later flush
    Deferred { entry_id: String },
    /// Neither the store nor the outbox took it
    Dropped { error: String },
}

impl AuditStatus {
    pub fn is_recorded(&self) -> bool {
        matches!(self, AuditStatus::Recorded { .. })
    }
}

/// Result of a successful transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionOutcome {
    pub lead_id: LeadId,
    pub from: Stage,
    pub to: Stage,
    pub next_action_at: Option<DateTime<Utc>>,
    pub audit: AuditStatus,
}

impl<G, N, C, I> LeadPipeline<G, N, C, I>
where
    G: Gateway,
    N: NotifyAdapter,
    C: Clock,
    I: IdGen,
{
    /// Move a lead to another stage
    ///
    /// The move is checked against the transition table before any gateway
    /// call. The new deadline and status are persisted together; if either
    /// step fails nothing changes. The audit activity is written last and a
    /// failure there does not undo the move.
    pub async fn transition(&self, id: LeadId, to: Stage) -> Result<TransitionOutcome, EngineError> {
        let lead = self.lead(id).await?;
        lead.status.check_transition(to)?;
        let now = self.clock.now();

        let next_action_at = match self.persist_stage(&lead, to, now).await {
            Ok(next_action_at) => next_action_at,
            Err(e) => {
                self.emit(Event::LeadTransitionFailed {
                    id,
                    to,
                    error: e.to_string(),
                })
                .await;
                return Err(e);
            }
        };

        let activity = NewActivity::status_change(id, self.config.actor_id, lead.status, to, now);
        let audit = self.record_audit(activity).await;

        self.emit(Event::LeadTransitioned {
            id,
            from: lead.status,
            to,
        })
        .await;
        self.refresh(Lead {
            status: to,
            next_action_at,
            updated_at: now,
            ..lead.clone()
        })
        .await;

        Ok(TransitionOutcome {
            lead_id: id,
            from: lead.status,
            to,
            next_action_at,
            audit,
        })
    }

    async fn persist_stage(
        &self,
        lead: &Lead,
        to: Stage,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, EngineError> {
        let data = self
            .gateway
            .run(rpc::CALCULATE_NEXT_ACTION_AT, vec![json!(to.as_str())])
            .await?;
        let next_action_at = rpc::parse_next_action_at(&data)?;

        self.gateway
            .table_update(
                self.config.tables.leads,
                json!({
                    "id": lead.id,
                    "status": to,
                    "next_action_at": next_action_at.map(|ts| ts.to_rfc3339()),
                    "updated_at": now.to_rfc3339(),
                }),
            )
            .await?;
        Ok(next_action_at)
    }

    async fn record_audit(&self, activity: NewActivity) -> AuditStatus {
        let lead_id = activity.lead_id;
        let error = match serde_json::to_value(&activity) {
            Ok(record) => match self
                .gateway
                .table_create(self.config.tables.activities, record)
                .await
            {
                Ok(activity_id) => return AuditStatus::Recorded { activity_id },
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };

        let status = match &self.outbox {
            Some(outbox) => {
                let entry_id = self.id_gen.next();
                let parked = outbox
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .defer(entry_id.clone(), activity, error.clone());
                match parked {
                    Ok(()) => AuditStatus::Deferred { entry_id },
                    Err(e) => {
                        tracing::error!(lead_id = %lead_id, error = %e, "audit outbox write failed");
                        AuditStatus::Dropped {
                            error: format!("{}; outbox: {}", error, e),
                        }
                    }
                }
            }
            None => {
                tracing::error!(lead_id = %lead_id, "no audit outbox configured, status change activity lost");
                AuditStatus::Dropped {
                    error: error.clone(),
                }
            }
        };

        let entry_id = match &status {
            AuditStatus::Deferred { entry_id } => entry_id.clone(),
            _ => String::new(),
        };
        self.emit(Event::AuditDeferred {
            id: lead_id,
            entry_id,
            error,
        })
        .await;
        status
    }

    /// Hand a lead to the external project creator
    pub async fn convert(&self, id: LeadId) -> Result<ProjectId, EngineError> {
        let lead = self.lead(id).await?;
        if let Some(project) = lead.converted_project_id {
            return Err(EngineError::AlreadyConverted { id, project });
        }
        if lead.status.is_terminal() {
            return Err(EngineError::NotConvertible {
                id,
                status: lead.status,
            });
        }

        let result = match self
            .gateway
            .run(
                rpc::CONVERT_LEAD_TO_PROJECT,
                vec![json!(id), json!(self.config.actor_id)],
            )
            .await
        {
            Ok(data) => rpc::parse_project_id(&data),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(project_id) => {
                self.emit(Event::LeadConverted { id, project_id }).await;
                self.refresh(Lead {
                    converted_project_id: Some(project_id),
                    ..lead
                })
                .await;
                Ok(project_id)
            }
            Err(e) => {
                self.emit(Event::LeadConvertFailed {
                    id,
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
