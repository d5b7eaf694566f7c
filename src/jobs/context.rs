//! Job context for dependency injection

use crate::db::QuestDatabase;
use crate::metrics::Metrics;
use crate::services::market_data::SnapshotProvider;
use std::sync::Arc;

/// Context passed to job handlers via Apalis Data<T> pattern
///
/// Contains read-only access to:
/// - Snapshot provider (cache or REST backed)
/// - Database (for storing signals)
/// - Metrics (for tracking evaluation statistics)
pub struct JobContext {
    pub snapshot_provider: Arc<dyn SnapshotProvider + Send + Sync>,
    pub database: Option<Arc<QuestDatabase>>,
    pub metrics: Option<Arc<Metrics>>,
}

impl JobContext {
    pub fn new(
        snapshot_provider: Arc<dyn SnapshotProvider + Send + Sync>,
        database: Option<Arc<QuestDatabase>>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            snapshot_provider,
            database,
            metrics,
        }
    }
}
