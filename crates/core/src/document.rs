// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Files attached to a lead

use crate::lead::LeadId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document record referencing an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub lead_id: LeadId,
    pub file_id: String,
    pub file_name: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub uploaded_by: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

/// Record body sent to the store after an upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub lead_id: LeadId,
    pub file_id: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

impl NewDocument {
    pub fn into_document(self, id: i64) -> Document {
        Document {
            id,
            lead_id: self.lead_id,
            file_id: self.file_id,
            file_name: self.file_name,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
            uploaded_by: self.uploaded_by,
            uploaded_at: self.uploaded_at,
        }
    }
}
