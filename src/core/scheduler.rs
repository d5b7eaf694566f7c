//! Cron-driven enqueue loop for snapshot fetches.
//!
//! Each tick pushes one `FetchSnapshotJob` per configured symbol onto the
//! Redis queue; the worker runtime picks them up from there.

use crate::jobs::types::FetchSnapshotJob;
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Fallback sleep when the schedule yields no upcoming tick
const IDLE_RECHECK: Duration = Duration::from_secs(60);

pub struct JobScheduler {
    queue: Arc<RedisStorage<FetchSnapshotJob>>,
    symbols: Vec<String>,
    schedule: Schedule,
    tick_task: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

/// Builds a six-field cron expression firing every `interval_seconds`.
/// Intervals of a minute or more are expressed in minutes so the second
/// field stays fixed.
fn interval_to_cron(interval_seconds: u64) -> String {
    if interval_seconds >= 60 {
        format!("0 */{} * * * *", interval_seconds / 60)
    } else {
        format!("*/{} * * * * *", interval_seconds)
    }
}

impl JobScheduler {
    /// Fails when `interval_seconds` is zero; a disabled schedule is a
    /// configuration error for the worker, not a silent no-op.
    pub fn new(
        queue: Arc<RedisStorage<FetchSnapshotJob>>,
        symbols: Vec<String>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if interval_seconds == 0 {
            return Err("scheduler interval must be greater than zero".into());
        }

        let expr = interval_to_cron(interval_seconds);
        let schedule = Schedule::from_str(&expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("bad cron expression '{}': {}", expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(
            interval_seconds,
            cron = %expr,
            symbols = ?symbols,
            "snapshot scheduler configured"
        );

        Ok(Self {
            queue,
            symbols,
            schedule,
            tick_task: Arc::new(RwLock::new(None)),
        })
    }

    /// Spawns the tick loop. Idempotent from the caller's point of view:
    /// a second call replaces the stored handle but the old task keeps
    /// running until `stop`, so call it once.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let queue = self.queue.clone();
        let symbols = self.symbols.clone();
        let schedule = self.schedule.clone();

        let task = tokio::spawn(async move {
            info!("snapshot scheduler running");
            loop {
                match schedule.upcoming(chrono::Utc).next() {
                    Some(tick) => {
                        let wait = (tick - chrono::Utc::now()).to_std().unwrap_or_default();
                        tokio::time::sleep(wait).await;
                    }
                    None => {
                        tokio::time::sleep(IDLE_RECHECK).await;
                        continue;
                    }
                }

                debug!(symbol_count = symbols.len(), "scheduler tick");
                for symbol in &symbols {
                    let mut queue = (*queue).clone();
                    let job = FetchSnapshotJob {
                        symbol: symbol.clone(),
                    };
                    if let Err(e) = queue.push(job).await {
                        error!(symbol = %symbol, error = %e, "failed to enqueue snapshot fetch");
                    } else {
                        debug!(symbol = %symbol, "snapshot fetch enqueued");
                    }
                }
            }
        });

        *self.tick_task.write().await = Some(task);
        info!("snapshot scheduler started");
        Ok(())
    }

    pub async fn stop(&self) {
        if let Some(task) = self.tick_task.write().await.take() {
            task.abort();
            info!("snapshot scheduler stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.tick_task.read().await.is_some()
    }
}
