//! Snapshot provider interface, the acquisition seam in front of the engine.
//!
//! The engine itself never fetches anything; a provider hands it the latest
//! envelope and the engine evaluates it as a pure function.

use crate::models::snapshot::SnapshotEnvelope;

#[async_trait::async_trait]
pub trait SnapshotProvider {
    /// Latest envelope for a symbol, None when nothing has been ingested yet
    async fn latest_snapshot(
        &self,
        symbol: &str,
    ) -> Result<Option<SnapshotEnvelope>, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct PlaceholderSnapshotProvider;

#[async_trait::async_trait]
impl SnapshotProvider for PlaceholderSnapshotProvider {
    async fn latest_snapshot(
        &self,
        _symbol: &str,
    ) -> Result<Option<SnapshotEnvelope>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(None)
    }
}
