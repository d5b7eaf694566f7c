//! Cache-backed snapshot provider
//!
//! Reads the latest envelope per symbol from Redis. An external ingest
//! service keeps the cache current; this provider never writes.

use crate::cache::RedisCache;
use crate::models::snapshot::SnapshotEnvelope;
use crate::services::market_data::SnapshotProvider;
use std::sync::Arc;
use tracing::debug;

pub struct CachedSnapshotProvider {
    cache: Arc<RedisCache>,
}

impl CachedSnapshotProvider {
    pub fn new(cache: Arc<RedisCache>) -> Self {
        Self { cache }
    }
}

#[async_trait::async_trait]
impl SnapshotProvider for CachedSnapshotProvider {
    async fn latest_snapshot(
        &self,
        symbol: &str,
    ) -> Result<Option<SnapshotEnvelope>, Box<dyn std::error::Error + Send + Sync>> {
        let envelope = self.cache.latest_snapshot(symbol).await?;
        if envelope.is_none() {
            debug!(symbol = %symbol, "no cached snapshot for {}", symbol);
        }
        Ok(envelope)
    }
}
