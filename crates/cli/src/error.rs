// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Engine and config failures are turned into an [`FmError`] carrying:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use fm_adapters::GatewayError;
use fm_core::{ConfigError, TransitionError};
use fm_engine::EngineError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct FmError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FmError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for FmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for FmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl FmError {
    /// No config file could be located
    pub fn config_not_found() -> Self {
        FmError::new("No config file found")
            .with_context("Looked for --config, $FM_CONFIG and ./foreman.toml")
            .with_suggestion("Create foreman.toml with [gateway] and [tables] sections")
            .with_suggestion("Point at an existing file: fm --config /path/to/foreman.toml")
    }

    pub fn config_invalid(path: &Path, err: ConfigError) -> Self {
        FmError::new(format!("Could not load {}", path.display()))
            .with_context(err.to_string())
            .with_source(err)
    }

    pub fn lead_not_found(id: impl fmt::Display) -> Self {
        FmError::new(format!("Lead {} not found", id))
            .with_context("The lead may have been deleted, or the id is mistyped")
            .with_suggestion("List leads: fm lead list")
    }

    fn unreachable(err: &GatewayError) -> Self {
        FmError::new("Could not reach the backend")
            .with_context(err.to_string())
            .with_suggestion("Check [gateway] base_url in foreman.toml")
            .with_suggestion("Raise [gateway] timeout if the backend is slow")
    }
}

impl From<EngineError> for FmError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::LeadNotFound(id) => FmError::lead_not_found(id),
            EngineError::Transition(TransitionError::Terminal(stage)) => {
                FmError::new(format!("Lead is {} and can no longer move", stage))
                    .with_context("Won and Lost are closed stages")
                    .with_suggestion("Show the transition table: fm stages")
            }
            EngineError::Gateway(ref gateway @ GatewayError::Transport(_)) => {
                FmError::unreachable(gateway).with_source(err)
            }
            EngineError::AlreadyConverted { id, project } => {
                FmError::new(format!("Lead {} is already converted", id))
                    .with_context(format!("It was handed off as project {}", project))
            }
            EngineError::DocumentsNotConfigured => FmError::new("Documents are not enabled")
                .with_suggestion("Set [tables] documents in foreman.toml"),
            EngineError::DocumentRecord {
                ref file_id,
                ref source,
            } => FmError::new("File uploaded but not attached")
                .with_context(format!("Orphaned file id: {}", file_id))
                .with_context(source.to_string())
                .with_suggestion("Retry the attach; the orphaned upload can be removed by an admin"),
            EngineError::OutboxNotConfigured => FmError::new("No audit outbox is configured")
                .with_suggestion("Set [outbox] path in foreman.toml"),
            other => FmError::new(other.to_string()).with_source(other),
        }
    }
}
