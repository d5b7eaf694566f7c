//! REST snapshot provider
//!
//! Pulls envelopes from an external snapshot API over HTTP. Transient
//! failures retry with exponential backoff before surfacing an error.

use crate::models::snapshot::SnapshotEnvelope;
use crate::services::market_data::SnapshotProvider;
use backon::{ExponentialBuilder, Retryable};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

const MAX_RETRIES: usize = 3;

pub struct RestSnapshotProvider {
    client: reqwest::Client,
    base_url: String,
}

impl RestSnapshotProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn fetch(
        &self,
        symbol: &str,
    ) -> Result<Option<SnapshotEnvelope>, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!("{}/snapshots/{}", self.base_url, symbol);

        let response = self.client.get(&url).send().await.map_err(|e| {
            Box::new(std::io::Error::other(format!(
                "Snapshot request failed for {}: {}",
                symbol, e
            ))) as Box<dyn std::error::Error + Send + Sync>
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(symbol = %symbol, "snapshot API has no data for {}", symbol);
            return Ok(None);
        }

        let response = response.error_for_status().map_err(|e| {
            Box::new(std::io::Error::other(format!(
                "Snapshot API returned error for {}: {}",
                symbol, e
            ))) as Box<dyn std::error::Error + Send + Sync>
        })?;

        let envelope = response.json::<SnapshotEnvelope>().await.map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to parse snapshot for {}: {}", symbol, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        Ok(Some(envelope))
    }
}

#[async_trait::async_trait]
impl SnapshotProvider for RestSnapshotProvider {
    async fn latest_snapshot(
        &self,
        symbol: &str,
    ) -> Result<Option<SnapshotEnvelope>, Box<dyn std::error::Error + Send + Sync>> {
        let result = (|| self.fetch(symbol))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(250))
                    .with_max_times(MAX_RETRIES),
            )
            .notify(|err, dur| {
                warn!(
                    symbol = %symbol,
                    error = %err,
                    "snapshot fetch failed, retrying in {:?}",
                    dur
                );
            })
            .await?;

        Ok(result)
    }
}
