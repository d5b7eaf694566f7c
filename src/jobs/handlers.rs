//! Job handlers for the snapshot evaluation workflow

use crate::jobs::context::JobContext;
use crate::jobs::types::{EvaluateSignalJob, FetchSnapshotJob, StoreSignalJob};
use crate::models::signal::{Evaluation, SignalLabel};
use crate::signals::engine::SignalEngine;
use apalis::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Handler for fetching a snapshot
///
/// Reads the latest envelope from the snapshot provider. If one is
/// available, enqueues EvaluateSignalJob.
pub async fn handle_fetch_snapshot(
    job: FetchSnapshotJob,
    ctx: Data<Arc<JobContext>>,
    eval_storage: Data<apalis_redis::RedisStorage<EvaluateSignalJob>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    debug!(symbol = %job.symbol, "FetchSnapshotJob: fetching snapshot for {}", job.symbol);

    let envelope = ctx
        .snapshot_provider
        .latest_snapshot(&job.symbol)
        .await
        .map_err(|e| {
            Box::new(std::io::Error::other(format!(
                "Snapshot provider error: {}",
                e
            ))) as Box<dyn std::error::Error + Send + Sync>
        })?;

    let Some(envelope) = envelope else {
        debug!(symbol = %job.symbol, "FetchSnapshotJob: no snapshot available yet for {}", job.symbol);
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("No snapshot available for {}", job.symbol),
        )) as Box<dyn std::error::Error + Send + Sync>);
    };

    let next_job = EvaluateSignalJob {
        symbol: job.symbol.clone(),
        envelope,
    };
    let mut storage = (*eval_storage).clone();
    storage.push(next_job).await.map_err(|e| {
        Box::new(std::io::Error::other(format!(
            "Failed to enqueue EvaluateSignalJob: {}",
            e
        ))) as Box<dyn std::error::Error + Send + Sync>
    })?;

    debug!(symbol = %job.symbol, "FetchSnapshotJob: enqueued EvaluateSignalJob for {}", job.symbol);
    Ok(())
}

/// Handler for evaluating a snapshot
///
/// Runs the scoring engine over the envelope. A ready signal is enqueued
/// for storage; an insufficient-data verdict ends the workflow quietly.
pub async fn handle_evaluate_signal(
    job: EvaluateSignalJob,
    ctx: Data<Arc<JobContext>>,
    store_storage: Data<apalis_redis::RedisStorage<StoreSignalJob>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let start = Instant::now();

    debug!(
        symbol = %job.symbol,
        session = ?job.envelope.session,
        "EvaluateSignalJob: evaluating snapshot for {}",
        job.symbol
    );

    if let Some(ref metrics) = ctx.metrics {
        metrics.signal_evaluations_active.inc();
    }

    let evaluation = SignalEngine::evaluate(&job.envelope.snapshot, job.envelope.session);

    if let Some(ref metrics) = ctx.metrics {
        metrics.signal_evaluations_total.inc();
        metrics
            .signal_evaluation_duration_seconds
            .observe(start.elapsed().as_secs_f64());
        metrics.signal_evaluations_active.dec();
    }

    match evaluation {
        Evaluation::Ready(signal) => {
            info!(
                symbol = %job.symbol,
                label = ?signal.label,
                confidence = signal.confidence,
                "EvaluateSignalJob: signal generated for {}: {:?} (confidence {})",
                job.symbol,
                signal.label,
                signal.confidence
            );

            let next_job = StoreSignalJob {
                symbol: job.symbol.clone(),
                signal,
            };
            let mut storage = (*store_storage).clone();
            storage.push(next_job).await.map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to enqueue StoreSignalJob: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;
        }
        Evaluation::InsufficientData { reason } => {
            if let Some(ref metrics) = ctx.metrics {
                metrics.insufficient_data_total.inc();
            }
            info!(
                symbol = %job.symbol,
                reason = %reason.describe(),
                "EvaluateSignalJob: waiting for data for {}: {}",
                job.symbol,
                reason.describe()
            );
        }
    }

    Ok(())
}

/// Handler for storing a signal
///
/// Stores the signal in the database. This is the final step in the workflow.
pub async fn handle_store_signal(
    job: StoreSignalJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let symbol = &job.symbol;

    if job.signal.label == SignalLabel::Wait {
        debug!(
            symbol = %symbol,
            label = ?job.signal.label,
            confidence = job.signal.confidence,
            "StoreSignalJob: storing wait signal for {} (confidence {})",
            symbol,
            job.signal.confidence
        );
    } else {
        info!(
            symbol = %symbol,
            label = ?job.signal.label,
            confidence = job.signal.confidence,
            "StoreSignalJob: storing signal for {}: {:?} (confidence {})",
            symbol,
            job.signal.label,
            job.signal.confidence
        );
    }

    if let Some(ref db) = ctx.database {
        if let Err(e) = db.store_signal(&job.signal).await {
            error!(
                symbol = %symbol,
                error = %e,
                "StoreSignalJob: failed to store signal in database for {}",
                symbol
            );
        } else {
            debug!(symbol = %symbol, "StoreSignalJob: stored signal in database for {}", symbol);
        }
    } else {
        debug!(symbol = %symbol, "StoreSignalJob: no database configured, signal not persisted");
    }

    Ok(())
}
