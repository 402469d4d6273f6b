// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the pipeline engine

use fm_adapters::{FileId, GatewayError};
use fm_core::{LeadId, ProjectId, Stage, TransitionError, ValidationError};
use fm_storage::OutboxError;
use thiserror::Error;

/// Errors that can occur in pipeline operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("outbox error: {0}")]
    Outbox(#[from] OutboxError),
    #[error("lead not found: {0}")]
    LeadNotFound(LeadId),
    #[error("lead {id} is already converted to project {project}")]
    AlreadyConverted { id: LeadId, project: ProjectId },
    #[error("lead {id} is {status} and cannot be converted")]
    NotConvertible { id: LeadId, status: Stage },
    #[error("unexpected {path} response: {detail}")]
    UnexpectedResponse { path: String, detail: String },
    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("file {file_id} uploaded but its document record failed: {source}")]
    DocumentRecord {
        file_id: FileId,
        #[source]
        source: GatewayError,
    },
    #[error("no documents table configured")]
    DocumentsNotConfigured,
    #[error("no audit outbox configured")]
    OutboxNotConfigured,
}

impl EngineError {
    pub(crate) fn unexpected(path: &str, detail: impl Into<String>) -> Self {
        EngineError::UnexpectedResponse {
            path: path.to_string(),
            detail: detail.into(),
        }
    }

    /// Whether the error was raised before any store call
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::Transition(_)
                | EngineError::AlreadyConverted { .. }
                | EngineError::NotConvertible { .. }
                | EngineError::DocumentsNotConfigured
        )
    }
}
