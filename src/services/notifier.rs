// src/services/notifier.rs

//! Notification delivery.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::{AppError, Result};

/// Sink for alert text.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text`. Errors are reported, never retried.
    async fn notify(&self, text: &str) -> Result<()>;
}

/// Posts alerts to a Discord-compatible webhook as `{"content": text}`.
pub struct WebhookNotifier {
    client: Client,
    endpoint: Option<String>,
}

impl WebhookNotifier {
    pub fn new(client: Client, endpoint: Option<String>) -> Self {
        Self { client, endpoint }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let Some(endpoint) = &self.endpoint else {
            log::warn!("No webhook configured, skipping alert");
            return Ok(());
        };

        let response = self
            .client
            .post(endpoint)
            .json(&json!({ "content": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::notify(format!(
                "webhook returned {status}: {}",
                body.trim()
            )));
        }
        Ok(())
    }
}
