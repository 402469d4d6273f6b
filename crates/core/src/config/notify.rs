// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification configuration
//!
//! Maps events to notifications based on pattern matching rules. The first
//! rule whose pattern matches decides; a disabled rule suppresses.

use crate::event::{Event, EventPattern};
use serde::{Deserialize, Serialize};

/// How loudly a notification should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyUrgency {
    #[default]
    Normal,
    Important,
}

/// A user-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Event name the notification was raised for
    pub channel: String,
    pub title: String,
    pub message: String,
    pub urgency: NotifyUrgency,
}

impl Notification {
    pub fn new(channel: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            title: title.into(),
            message: message.into(),
            urgency: NotifyUrgency::Normal,
        }
    }

    pub fn with_urgency(mut self, urgency: NotifyUrgency) -> Self {
        self.urgency = urgency;
        self
    }
}

/// A rule mapping an event pattern to a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyRule {
    pub pattern: EventPattern,
    #[serde(default)]
    pub urgency: NotifyUrgency,
    /// If true, show notification. If false, suppress.
    #[serde(default = "enabled")]
    pub enabled: bool,
}

fn enabled() -> bool {
    true
}

/// Configuration for which events trigger notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default, rename = "rule")]
    rules: Vec<NotifyRule>,
}

impl NotifyConfig {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Failures and alerts notify; routine successes stay in the log
    pub fn default_config() -> Self {
        let mut config = Self::new();

        config.add_rule("lead:create_failed", NotifyUrgency::Important, true);
        config.add_rule("lead:transition_failed", NotifyUrgency::Important, true);
        config.add_rule("lead:convert_failed", NotifyUrgency::Important, true);
        config.add_rule("audit:deferred", NotifyUrgency::Normal, true);
        config.add_rule("lead:converted", NotifyUrgency::Normal, true);

        config.add_rule("alert:critical", NotifyUrgency::Important, true);
        config.add_rule("alert:**", NotifyUrgency::Normal, true);

        config
    }

    pub fn add_rule(&mut self, pattern: &str, urgency: NotifyUrgency, enabled: bool) {
        self.rules.push(NotifyRule {
            pattern: EventPattern::new(pattern),
            urgency,
            enabled,
        });
    }

    pub fn rules(&self) -> &[NotifyRule] {
        &self.rules
    }

    /// Check if an event should trigger a notification
    pub fn should_notify(&self, event: &Event) -> Option<NotifyUrgency> {
        let event_name = event.name();
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(&event_name))
            .filter(|rule| rule.enabled)
            .map(|rule| rule.urgency)
    }

    /// Convert an event to a notification if configured
    pub fn to_notification(&self, event: &Event) -> Option<Notification> {
        let urgency = self.should_notify(event)?;
        Some(event_to_notification(event).with_urgency(urgency))
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn event_to_notification(event: &Event) -> Notification {
    let title = match event {
        Event::LeadCreateFailed { .. } => "Lead Not Created".to_string(),
        Event::LeadTransitionFailed { .. } => "Status Change Failed".to_string(),
        Event::LeadConvertFailed { .. } => "Conversion Failed".to_string(),
        Event::AuditDeferred { .. } => "Audit Entry Deferred".to_string(),
        Event::LeadConverted { .. } => "Lead Converted".to_string(),
        Event::Alert { title, .. } => title.clone(),
        other => other.name().replace([':', '_'], " ").to_uppercase(),
    };
    let message = match event {
        Event::Alert { message, .. } => message.clone(),
        other => other.message(),
    };
    Notification::new(event.name(), title, message)
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
