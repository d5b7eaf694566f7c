//! Job types for the snapshot evaluation workflow

use crate::models::signal::SignalOutput;
use crate::models::snapshot::SnapshotEnvelope;
use serde::{Deserialize, Serialize};

/// Job to fetch the latest snapshot for a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSnapshotJob {
    pub symbol: String,
}

/// Job to evaluate a signal from a snapshot envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateSignalJob {
    pub symbol: String,
    pub envelope: SnapshotEnvelope,
}

/// Job to store an emitted signal in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSignalJob {
    pub symbol: String,
    pub signal: SignalOutput,
}
