//! Tickpulse worker
//!
//! Drives the fetch → evaluate → store pipeline off the Redis queue.
//! Runs as its own process alongside the API server.

use apalis_redis::RedisStorage;
use dotenvy::dotenv;
use std::sync::Arc;
use tickpulse::cache::RedisCache;
use tickpulse::core::runtime::{RuntimeConfig, SignalRuntime};
use tickpulse::core::scheduler::JobScheduler;
use tickpulse::db::QuestDatabase;
use tickpulse::jobs::context::JobContext;
use tickpulse::jobs::types::{EvaluateSignalJob, FetchSnapshotJob, StoreSignalJob};
use tickpulse::logging;
use tickpulse::metrics::Metrics;
use tickpulse::services::cached_provider::CachedSnapshotProvider;
use tickpulse::services::market_data::SnapshotProvider;
use tickpulse::services::rest_provider::RestSnapshotProvider;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let eval_interval = tickpulse::config::get_eval_interval_seconds();
    let symbols = tickpulse::config::get_symbols();
    let env = tickpulse::config::get_environment();

    info!(environment = %env, "starting tickpulse worker");

    if eval_interval == 0 {
        return Err("EVAL_INTERVAL_SECONDS must be > 0 for worker".into());
    }

    let metrics = Arc::new(Metrics::new()?);

    // Persistence is best-effort; evaluation keeps running without it
    let database = match QuestDatabase::new().await {
        Ok(db) => {
            info!("questdb connected");
            metrics.database_connected.set(1.0);
            Some(Arc::new(db))
        }
        Err(e) => {
            warn!(error = %e, "questdb unavailable, signals will not be persisted");
            None
        }
    };

    let concurrency: usize = std::env::var("WORKER_CONCURRENCY")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(|| symbols.len().max(1));

    info!(
        concurrency,
        interval_seconds = eval_interval,
        symbols = ?symbols,
        "worker configuration loaded"
    );

    let runtime_config = RuntimeConfig {
        evaluation_interval_seconds: eval_interval,
        symbols: symbols.clone(),
    };

    let snapshot_source = tickpulse::config::get_snapshot_source();
    let snapshot_provider: Arc<dyn SnapshotProvider + Send + Sync> =
        if snapshot_source == "rest" {
            let api_url = tickpulse::config::get_snapshot_api_url();
            info!(url = %api_url, "snapshot source: rest");
            Arc::new(RestSnapshotProvider::new(api_url))
        } else {
            // The cached provider is the default read path and a hard
            // requirement: an external ingest service writes the cache
            let cache = match RedisCache::new().await {
                Ok(c) => {
                    info!("redis cache connected");
                    metrics.cache_connected.set(1.0);
                    Arc::new(c)
                }
                Err(e) => {
                    return Err(format!("Redis connection required for worker: {}", e).into());
                }
            };
            info!("snapshot source: redis cache");
            Arc::new(CachedSnapshotProvider::new(cache))
        };

    let redis_url = tickpulse::config::get_redis_url();
    let conn = apalis_redis::connect(redis_url.clone()).await?;
    let fetch_storage: Arc<RedisStorage<FetchSnapshotJob>> =
        Arc::new(RedisStorage::new(conn.clone()));
    let eval_storage: Arc<RedisStorage<EvaluateSignalJob>> =
        Arc::new(RedisStorage::new(conn.clone()));
    let store_storage: Arc<RedisStorage<StoreSignalJob>> = Arc::new(RedisStorage::new(conn));
    info!("job queues ready");

    let job_context = Arc::new(JobContext::new(
        snapshot_provider,
        database.clone(),
        Some(metrics.clone()),
    ));

    let runtime = SignalRuntime::new(
        runtime_config.clone(),
        job_context,
        fetch_storage.clone(),
        eval_storage.clone(),
        store_storage.clone(),
    )
    .with_concurrency(concurrency);
    let worker_handles = runtime
        .start_workers()
        .await
        .map_err(|e| format!("Failed to start workers: {}", e))?;

    let scheduler = JobScheduler::new(fetch_storage, symbols.clone(), eval_interval)
        .map_err(|e| format!("Failed to create scheduler: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| format!("Failed to start scheduler: {}", e))?;

    info!("worker running, ctrl-c to stop");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
            scheduler.stop().await;
            for handle in worker_handles {
                handle.abort();
            }
            info!("worker shut down cleanly");
        }
    }

    Ok(())
}
