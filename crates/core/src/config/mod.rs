// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration
//!
//! Loaded from a TOML file. Only `[gateway]` and `[tables]` are required;
//! every other section falls back to its defaults.

mod notify;

pub use notify::{Notification, NotifyConfig, NotifyRule, NotifyUrgency};

use crate::query::TableId;
use crate::sla::SlaThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "FM_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "foreman.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found (pass --config, set {CONFIG_ENV}, or create ./{DEFAULT_CONFIG_FILE})")]
    NotFound,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub tables: TablesConfig,
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub sla: SlaThresholds,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub outbox: OutboxConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Environment variable holding a bearer token
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesConfig {
    pub leads: TableId,
    pub activities: TableId,
    #[serde(default)]
    pub documents: Option<TableId>,
}

/// The acting user recorded on activities and conversions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxConfig {
    #[serde(default = "default_outbox_path")]
    pub path: PathBuf,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            path: default_outbox_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Write logs here instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rows requested per page when loading leads
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_outbox_path() -> PathBuf {
    PathBuf::from(".foreman/outbox.wal")
}

fn default_page_size() -> u32 {
    200
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Pick the config file: explicit path, then `$FM_CONFIG`, then
    /// `./foreman.toml` if it exists
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Ok(local);
        }
        Err(ConfigError::NotFound)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.gateway.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "gateway.base_url must be an http(s) URL, got {:?}",
                self.gateway.base_url
            )));
        }
        if self.gateway.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "gateway.timeout must be greater than zero".to_string(),
            ));
        }
        if !self.sla.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "sla.critical_within ({}) must be shorter than sla.warning_within ({})",
                humantime::format_duration(self.sla.critical_within),
                humantime::format_duration(self.sla.warning_within)
            )));
        }
        if self.alerts.poll_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "alerts.poll_interval must be greater than zero".to_string(),
            ));
        }
        if self.pipeline.page_size == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Bearer token read from the configured environment variable
    pub fn gateway_token(&self) -> Option<String> {
        let var = self.gateway.token_env.as_deref()?;
        std::env::var(var).ok().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
