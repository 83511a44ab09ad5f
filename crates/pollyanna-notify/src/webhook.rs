//! Webhook notifier: POSTs each message as JSON to an HTTP endpoint.
//!
//! The endpoint owns actual delivery (mail relay, chat bot, ...). A 2xx
//! answer counts as delivered; the receipt id is taken from an `id` field in
//! the JSON response body when present.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::NotifyError;
use crate::message::Message;
use crate::notifier::{DeliveryReceipt, Notifier};
use crate::Result;

/// Webhook configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint receiving one POST per message
    pub url: String,
    /// Bearer token (optional)
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn new(url: &str) -> Self {
        WebhookConfig {
            url: url.to_string(),
            token: None,
            timeout_secs: 30,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    id: Option<String>,
}

pub struct WebhookNotifier {
    config: WebhookConfig,
    http_client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(NotifyError::NotConfigured("webhook url is empty".to_string()));
        }
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("pollyanna-notify/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(WebhookNotifier {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn channel(&self) -> &'static str {
        "webhook"
    }

    async fn deliver(&self, message: &Message) -> Result<DeliveryReceipt> {
        let mut request = self.http_client.post(&self.config.url).json(message);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let id = serde_json::from_str::<WebhookResponse>(&body)
            .ok()
            .and_then(|r| r.id)
            .unwrap_or_else(|| status.as_u16().to_string());
        debug!(participant = %message.participant, id = %id, "Webhook accepted message");

        Ok(DeliveryReceipt { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_rejected() {
        assert!(matches!(
            WebhookNotifier::new(WebhookConfig::new("  ")),
            Err(NotifyError::NotConfigured(_))
        ));
    }

    #[test]
    fn builder_sets_token_and_timeout() {
        let config = WebhookConfig::new("http://localhost:9/hook")
            .with_token("secret")
            .with_timeout_secs(5);
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
    }
}
