// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Documents attached to leads

use crate::error::EngineError;
use crate::pipeline::LeadPipeline;
use fm_adapters::{FileUpload, Gateway, NotifyAdapter};
use fm_core::{Clock, Document, Event, IdGen, LeadId, NewDocument};

impl<G, N, C, I> LeadPipeline<G, N, C, I>
where
    G: Gateway,
    N: NotifyAdapter,
    C: Clock,
    I: IdGen,
{
    /// Upload a file and record it against a lead
    ///
    /// If the upload succeeds but the document record does not, the error
    /// carries the orphaned file id.
    pub async fn attach(
        &self,
        lead_id: LeadId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Document, EngineError> {
        let table = self
            .config
            .tables
            .documents
            .ok_or(EngineError::DocumentsNotConfigured)?;
        self.lead(lead_id).await?;

        let upload = FileUpload::new(file_name, bytes);
        let content_type = upload.content_type.clone();
        let size_bytes = upload.bytes.len() as u64;
        let file_id = self.gateway.upload(upload).await?;

        let record = NewDocument {
            lead_id,
            file_id: file_id.0.clone(),
            file_name: file_name.to_string(),
            content_type,
            size_bytes,
            uploaded_by: self.config.actor_id,
            uploaded_at: self.clock.now(),
        };
        let id = match self
            .gateway
            .table_create(table, serde_json::to_value(&record)?)
            .await
        {
            Ok(id) => id,
            Err(source) => {
                tracing::error!(lead_id = %lead_id, file_id = %file_id, error = %source, "document record failed");
                return Err(EngineError::DocumentRecord { file_id, source });
            }
        };

        self.emit(Event::DocumentAttached {
            lead_id,
            file_id: file_id.0,
        })
        .await;
        Ok(record.into_document(id))
    }
}

#[cfg(test)]
#[path = "documents_tests.rs"]
mod tests;
