//! Issue tracker adapter. Writes the agreed estimate into an issue field via
//! the tracker's REST API.

use crate::config::IssueConfig;
use crate::db::{FlagStore, last_push_key};
use crate::error::{AppError, Result};
use chrono::Utc;
use log::{error, info};
use reqwest::Client;
use serde_json::{Value, json};

pub struct IssueClient {
    client: Client,
    config: IssueConfig,
}

impl IssueClient {
    pub fn new(config: IssueConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    // Use a preconfigured reqwest client (proxy, timeouts)
    pub fn with_client(config: IssueConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn issue_url(&self, issue_key: &str) -> String {
        format!("{}/rest/api/2/issue/{}", self.config.base_url, issue_key)
    }

    pub fn update_body(&self, estimate: f64) -> Value {
        let mut fields = serde_json::Map::new();
        fields.insert(self.config.estimate_field.clone(), json!(estimate));
        json!({ "fields": fields })
    }

    /// Sends a single field update. No retries.
    pub async fn update_estimate(&self, issue_key: &str, estimate: f64) -> Result<()> {
        let res = self
            .client
            .put(self.issue_url(issue_key))
            .bearer_auth(&self.config.api_token)
            .json(&self.update_body(estimate))
            .send()
            .await?;

        // Surface the tracker's own error text
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(AppError::IssueUpdate { status, body });
        }

        Ok(())
    }
}

/// Pushes `estimate` once and records when it happened. Failures are logged,
/// never retried and never rolled back. Returns whether the update went through.
pub async fn push_estimate(
    client: &IssueClient,
    flags: &FlagStore,
    issue_key: &str,
    estimate: f64,
) -> bool {
    match client.update_estimate(issue_key, estimate).await {
        Ok(()) => {
            info!("Set estimate of {} to {}", issue_key, estimate);
            if let Err(e) = flags.set_timestamp(&last_push_key(issue_key), Utc::now()).await {
                error!("Estimate pushed but timestamp not recorded for {}: {}", issue_key, e);
            }
            true
        }
        Err(e) => {
            error!("Failed to update estimate of {}: {}", issue_key, e);
            false
        }
    }
}
