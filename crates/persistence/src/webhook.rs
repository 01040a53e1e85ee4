//! CRM webhook store
//!
//! POSTs each lead as JSON to a configured URL. Non-2xx responses are
//! errors; there is no retry here, the caller logs and counts failures.

use std::time::Duration;

use async_trait::async_trait;
use concierge_config::WebhookConfig;

use crate::leads::{LeadStore, StoredLead};
use crate::PersistenceError;

pub struct WebhookLeadStore {
    client: reqwest::Client,
    url: String,
    auth_token: Option<String>,
}

impl WebhookLeadStore {
    pub fn new(config: &WebhookConfig) -> Result<Self, PersistenceError> {
        let url = config
            .url
            .clone()
            .ok_or_else(|| PersistenceError::Webhook("webhook url not configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url,
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LeadStore for WebhookLeadStore {
    async fn save(&self, lead: &StoredLead) -> Result<(), PersistenceError> {
        let mut request = self.client.post(&self.url).json(lead);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PersistenceError::Webhook(format!(
                "CRM responded with {}",
                status
            )));
        }

        tracing::info!(lead_id = %lead.lead_id, status = %status, "Lead delivered to CRM");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}
