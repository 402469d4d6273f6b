// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP gateway
//!
//! Every call is a `POST` to `{base_url}/apis/{endpoint}` answered with an
//! envelope `{"data": ..., "error": null | "message"}`. Requests run on the
//! blocking pool since the HTTP client is synchronous.

use super::{FileId, FileUpload, Gateway, GatewayError};
use async_trait::async_trait;
use fm_core::{Config, Page, PageQuery, RecordId, TableId};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Gateway talking to the backend over HTTP
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<Client>,
}

struct Client {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<Value>,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration, token: Option<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            inner: Arc::new(Client {
                agent: ureq::Agent::new_with_config(config),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                token,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gateway.base_url.trim(),
            config.gateway.timeout,
            config.gateway_token(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    async fn post(&self, endpoint: &'static str, body: Value) -> Result<Value, GatewayError> {
        let client = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || client.post_json(endpoint, &body))
            .await
            .map_err(|e| GatewayError::Transport(format!("request task failed: {}", e)))?
    }
}

impl Client {
    fn url(&self, endpoint: &str) -> String {
        endpoint_url(&self.base_url, endpoint)
    }

    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, GatewayError> {
        let request = self
            .authorize(self.agent.post(self.url(endpoint)))
            .header("Content-Type", "application/json");
        let mut response = request
            .send(body.to_string())
            .map_err(|e| GatewayError::Transport(format!("POST {}: {}", endpoint, e)))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| GatewayError::Transport(format!("failed to read response: {}", e)))?;
        unwrap_envelope(&text)
    }

    fn post_bytes(&self, file: &FileUpload) -> Result<Value, GatewayError> {
        let request = self
            .authorize(self.agent.post(self.url("upload")))
            .query("filename", &file.file_name)
            .header("Content-Type", &file.content_type);
        let mut response = request
            .send(&file.bytes[..])
            .map_err(|e| GatewayError::Transport(format!("POST upload: {}", e)))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| GatewayError::Transport(format!("failed to read response: {}", e)))?;
        unwrap_envelope(&text)
    }
}

pub(crate) fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/apis/{}", base_url.trim_end_matches('/'), endpoint)
}

/// Extract `data` from a response envelope, surfacing a backend `error`
pub(crate) fn unwrap_envelope(body: &str) -> Result<Value, GatewayError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| GatewayError::Decode(format!("malformed envelope: {}", e)))?;
    match envelope.error {
        None | Some(Value::Null) => Ok(envelope.data),
        Some(Value::String(message)) if message.is_empty() => Ok(envelope.data),
        Some(Value::String(message)) => Err(GatewayError::Remote(message)),
        Some(other) => Err(GatewayError::Remote(other.to_string())),
    }
}

/// Record ids come back bare or wrapped in `{"id": n}`
pub(crate) fn parse_record_id(data: &Value) -> Result<RecordId, GatewayError> {
    let id = match data {
        Value::Object(map) => map.get("id").or_else(|| map.get("Id")),
        other => Some(other),
    };
    match id {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| GatewayError::Decode(format!("expected a record id, got {}", data)))
}

/// File ids come back bare or wrapped in `{"id"|"fileId": ...}`
pub(crate) fn parse_file_id(data: &Value) -> Result<FileId, GatewayError> {
    let id = match data {
        Value::Object(map) => map.get("fileId").or_else(|| map.get("id")),
        other => Some(other),
    };
    match id {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
    .map(FileId)
    .ok_or_else(|| GatewayError::Decode(format!("expected a file id, got {}", data)))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn table_page(
        &self,
        table: TableId,
        query: &PageQuery,
    ) -> Result<Page<Value>, GatewayError> {
        let data = self
            .post("tablePage", json!({ "id": table, "param": query }))
            .await?;
        if data.is_null() {
            return Ok(Page::empty());
        }
        serde_json::from_value(data).map_err(|e| GatewayError::Decode(format!("page: {}", e)))
    }

    async fn table_create(&self, table: TableId, record: Value) -> Result<RecordId, GatewayError> {
        let data = self
            .post("tableCreate", json!({ "id": table, "param": record }))
            .await?;
        parse_record_id(&data)
    }

    async fn table_update(&self, table: TableId, record: Value) -> Result<(), GatewayError> {
        self.post("tableUpdate", json!({ "id": table, "param": record }))
            .await?;
        Ok(())
    }

    async fn run(&self, path: &str, args: Vec<Value>) -> Result<Value, GatewayError> {
        self.post("run", json!({ "path": path, "param": args })).await
    }

    async fn upload(&self, file: FileUpload) -> Result<FileId, GatewayError> {
        let client = Arc::clone(&self.inner);
        let data = tokio::task::spawn_blocking(move || client.post_bytes(&file))
            .await
            .map_err(|e| GatewayError::Transport(format!("upload task failed: {}", e)))??;
        parse_file_id(&data)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
