// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend gateway adapters
//!
//! The store, the business-rule RPCs and file upload all sit behind one
//! opaque backend. Callers get a [`Gateway`] injected and never reach for a
//! global client.

mod http;

pub use http::HttpGateway;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeGateway, GatewayCall, GatewayOp};

use async_trait::async_trait;
use fm_core::{Page, PageQuery, RecordId, TableId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors from gateway calls
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The request never produced a usable response
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend answered with an error
    #[error("backend error: {0}")]
    Remote(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("record not found: {0}")]
    NotFound(String),
}

/// Opaque id of an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }
}

/// Guess a MIME type from the file extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// Adapter for the backend: table CRUD, named RPCs and uploads
#[async_trait]
pub trait Gateway: Clone + Send + Sync + 'static {
    /// Fetch one page of records matching the query filters
    async fn table_page(&self, table: TableId, query: &PageQuery)
        -> Result<Page<Value>, GatewayError>;

    /// Insert a record and return its new id
    async fn table_create(&self, table: TableId, record: Value) -> Result<RecordId, GatewayError>;

    /// Update a record; `record` carries its `id`
    async fn table_update(&self, table: TableId, record: Value) -> Result<(), GatewayError>;

    /// Invoke a named backend function
    async fn run(&self, path: &str, args: Vec<Value>) -> Result<Value, GatewayError>;

    async fn upload(&self, file: FileUpload) -> Result<FileId, GatewayError>;
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
