// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analytics RPC wrappers

use crate::error::EngineError;
use crate::pipeline::LeadPipeline;
use crate::rpc::{self, Alert};
use fm_adapters::{Gateway, NotifyAdapter};
use fm_core::{Clock, Event, IdGen};
use serde_json::{json, Value};

impl<G, N, C, I> LeadPipeline<G, N, C, I>
where
    G: Gateway,
    N: NotifyAdapter,
    C: Clock,
    I: IdGen,
{
    /// Dashboard payload, optionally for a named date range
    pub async fn dashboard(&self, range: Option<&str>) -> Result<Value, EngineError> {
        let args = range.map(|r| vec![json!(r)]).unwrap_or_default();
        Ok(self
            .gateway
            .run(rpc::GET_ANALYTICS_DASHBOARD_DATA, args)
            .await?)
    }

    /// Time series for one metric
    pub async fn trends(&self, metric: &str, period: Option<&str>) -> Result<Value, EngineError> {
        let mut args = vec![json!(metric)];
        if let Some(period) = period {
            args.push(json!(period));
        }
        Ok(self.gateway.run(rpc::GET_ANALYTICS_TRENDS, args).await?)
    }

    /// Ask the backend for alerts and forward each one to the notifier
    pub async fn check_alerts(&self) -> Result<Vec<Alert>, EngineError> {
        let result = match self.gateway.run(rpc::CHECK_ANALYTICS_ALERTS, Vec::new()).await {
            Ok(data) => rpc::parse_alerts(&data),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(alerts) => {
                for alert in &alerts {
                    self.emit(Event::Alert {
                        severity: alert.severity.clone(),
                        title: alert.title.clone(),
                        message: alert.message.clone(),
                    })
                    .await;
                }
                Ok(alerts)
            }
            Err(e) => {
                self.emit(Event::AlertCheckFailed {
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod tests;
