//! Redis cache for the latest snapshot envelope per symbol
//!
//! The ingest collaborator writes, the worker and providers read. One key
//! per symbol holding the most recent envelope as JSON.

use crate::config;
use crate::models::snapshot::SnapshotEnvelope;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let redis_url = config::get_redis_url();
        let client = redis::Client::open(redis_url).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid Redis URL: {}", e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;
        let manager = ConnectionManager::new(client).await.map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("Failed to connect to Redis: {}", e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        Ok(Self { manager })
    }

    fn snapshot_key(symbol: &str) -> String {
        format!("tickpulse:snapshot:{}", symbol)
    }

    /// Replace the cached envelope for the symbol atomically
    pub async fn put_snapshot(
        &self,
        envelope: &SnapshotEnvelope,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let payload = serde_json::to_string(envelope).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to serialize snapshot envelope: {}", e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(Self::snapshot_key(&envelope.snapshot.symbol), payload)
            .await
            .map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to write snapshot to Redis: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

        Ok(())
    }

    /// Latest cached envelope for the symbol, None when nothing was ingested yet
    pub async fn latest_snapshot(
        &self,
        symbol: &str,
    ) -> Result<Option<SnapshotEnvelope>, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.manager.clone();
        let payload: Option<String> =
            conn.get(Self::snapshot_key(symbol)).await.map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to read snapshot from Redis: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

        match payload {
            Some(raw) => {
                let envelope = serde_json::from_str(&raw).map_err(|e| {
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Failed to deserialize snapshot envelope: {}", e),
                    )) as Box<dyn std::error::Error + Send + Sync>
                })?;
                Ok(Some(envelope))
            }
            None => Ok(None),
        }
    }
}
