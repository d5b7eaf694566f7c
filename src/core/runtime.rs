//! Apalis worker wiring for the fetch → evaluate → store pipeline.

use crate::jobs::context::JobContext;
use crate::jobs::handlers;
use crate::jobs::types::{EvaluateSignalJob, FetchSnapshotJob, StoreSignalJob};
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct RuntimeConfig {
    pub evaluation_interval_seconds: u64,
    pub symbols: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_seconds: 60,
            symbols: vec!["BTC-USD".to_string()],
        }
    }
}

/// Owns the three queue backends and spawns one worker per stage.
/// Stages hand off by pushing onto the next stage's queue, so each
/// worker only needs its own backend plus the downstream storage.
pub struct SignalRuntime {
    context: Arc<JobContext>,
    fetch_queue: Arc<RedisStorage<FetchSnapshotJob>>,
    evaluate_queue: Arc<RedisStorage<EvaluateSignalJob>>,
    store_queue: Arc<RedisStorage<StoreSignalJob>>,
    concurrency: usize,
}

impl SignalRuntime {
    pub fn new(
        config: RuntimeConfig,
        context: Arc<JobContext>,
        fetch_queue: Arc<RedisStorage<FetchSnapshotJob>>,
        evaluate_queue: Arc<RedisStorage<EvaluateSignalJob>>,
        store_queue: Arc<RedisStorage<StoreSignalJob>>,
    ) -> Self {
        // One lane per symbol unless overridden
        let concurrency = config.symbols.len().max(1);
        Self {
            context,
            fetch_queue,
            evaluate_queue,
            store_queue,
            concurrency,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Spawns all three stage workers and hands back their join handles
    /// so the caller can abort them on shutdown.
    pub async fn start_workers(
        &self,
    ) -> Result<Vec<tokio::task::JoinHandle<()>>, Box<dyn std::error::Error + Send + Sync>> {
        info!(concurrency = self.concurrency, "starting signal pipeline workers");

        let handles = vec![
            self.spawn_fetch_stage(),
            self.spawn_evaluate_stage(),
            self.spawn_store_stage(),
        ];

        info!("signal pipeline workers online");
        Ok(handles)
    }

    fn spawn_fetch_stage(&self) -> tokio::task::JoinHandle<()> {
        let backend = (*self.fetch_queue).clone();
        let downstream = self.evaluate_queue.clone();
        let context = self.context.clone();
        tokio::spawn(async move {
            let worker = WorkerBuilder::new("fetch-snapshot-worker")
                .data(context)
                .data(downstream)
                .backend(backend)
                .build_fn(handlers::handle_fetch_snapshot);
            info!("fetch-snapshot worker started");
            worker.run().await;
        })
    }

    fn spawn_evaluate_stage(&self) -> tokio::task::JoinHandle<()> {
        let backend = (*self.evaluate_queue).clone();
        let downstream = self.store_queue.clone();
        let context = self.context.clone();
        tokio::spawn(async move {
            let worker = WorkerBuilder::new("evaluate-signal-worker")
                .data(context)
                .data(downstream)
                .backend(backend)
                .build_fn(handlers::handle_evaluate_signal);
            info!("evaluate-signal worker started");
            worker.run().await;
        })
    }

    fn spawn_store_stage(&self) -> tokio::task::JoinHandle<()> {
        let backend = (*self.store_queue).clone();
        let context = self.context.clone();
        tokio::spawn(async move {
            let worker = WorkerBuilder::new("store-signal-worker")
                .data(context)
                .backend(backend)
                .build_fn(handlers::handle_store_signal);
            info!("store-signal worker started");
            worker.run().await;
        })
    }
}
