use async_trait::async_trait;
use serde_json::json;

use crate::{
    config::WebhookConfig,
    error::{AppError, Result},
    integrations::{EventSink, PortalEvent},
};

/// Posts `{topic, payload}` JSON to a configured endpoint. Used for both the
/// signals channel and the notifications channel, each with its own endpoint.
pub struct WebhookSink {
    name: String,
    config: WebhookConfig,
    http: reqwest::Client,
}

impl WebhookSink {
    pub fn new(name: impl Into<String>, config: Option<WebhookConfig>) -> Option<Self> {
        config.and_then(|cfg| {
            if cfg.enabled {
                Some(Self {
                    name: name.into(),
                    config: cfg,
                    http: reqwest::Client::new(),
                })
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl EventSink for WebhookSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn health_check(&self) -> Result<()> {
        if self.config.endpoint.is_empty() {
            return Err(AppError::Integration(format!(
                "{} webhook endpoint not configured",
                self.name
            )));
        }
        Ok(())
    }

    async fn handle_event(&self, event: &PortalEvent) -> Result<()> {
        let body = json!({
            "topic": event.topic(),
            "payload": event.payload(),
        });

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Integration(format!("{} webhook failed: {}", self.name, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Integration(format!(
                "{} webhook returned {}",
                self.name,
                response.status()
            )));
        }

        Ok(())
    }
}
