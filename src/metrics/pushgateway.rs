//! Prometheus push gateway client
//!
//! Pushes use POST (`pushadd` semantics): only metric names present in the
//! pushed registry are replaced for the job's grouping key.

use std::time::Duration;

use prometheus::{Encoder, Registry, TextEncoder};

use crate::config::PushGatewayConfig;
use crate::error::CollectorError;

pub struct PushGateway {
    client: reqwest::Client,
    url: String,
    job: String,
}

impl PushGateway {
    pub fn new(config: &PushGatewayConfig) -> Result<Self, CollectorError> {
        if config.url.trim().is_empty() {
            return Err(CollectorError::Config("push gateway url is empty".to_string()));
        }
        if config.job.trim().is_empty() {
            return Err(CollectorError::Config("push gateway job is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            job: config.job.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/metrics/job/{}", self.url, self.job)
    }

    /// Push every metric in `registry` in one request
    pub async fn push_add(&self, registry: &Registry) -> Result<(), CollectorError> {
        let encoder = TextEncoder::new();
        let families = registry.gather();
        let body = encoder.encode_to_string(&families)?;

        let response = self
            .client
            .post(self.endpoint())
            .header(reqwest::header::CONTENT_TYPE, encoder.format_type())
            .body(body)
            .send()
            .await
            .map_err(|e| CollectorError::Network(format!("Push request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CollectorError::Network(format!(
                "Push gateway returned {}: {}",
                status,
                text.trim()
            )));
        }

        tracing::info!(
            "[PushGateway] Pushed {} metrics for job {}",
            families.len(),
            self.job
        );
        Ok(())
    }
}
