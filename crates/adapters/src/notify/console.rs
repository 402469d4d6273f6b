// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console notifier: one line per notification on a terminal stream

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;
use fm_core::{Notification, NotifyUrgency};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Writes notifications as text lines, stderr by default
#[derive(Clone)]
pub struct ConsoleNotifyAdapter {
    out: Arc<Mutex<dyn Write + Send>>,
}

impl ConsoleNotifyAdapter {
    pub fn stderr() -> Self {
        Self::with_writer(std::io::stderr())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(writer)),
        }
    }
}

impl Default for ConsoleNotifyAdapter {
    fn default() -> Self {
        Self::stderr()
    }
}

pub(crate) fn format_line(notification: &Notification) -> String {
    let marker = match notification.urgency {
        NotifyUrgency::Important => "!",
        NotifyUrgency::Normal => "-",
    };
    format!(
        "[{}] {}: {}",
        marker, notification.title, notification.message
    )
}

#[async_trait]
impl NotifyAdapter for ConsoleNotifyAdapter {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let line = format_line(notification);
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{}", line).map_err(|e| NotifyError::SendFailed(e.to_string()))?;
        out.flush()
            .map_err(|e| NotifyError::SendFailed(e.to_string()))
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
