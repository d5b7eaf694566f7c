//! Job queue system for snapshot evaluation

pub mod context;
pub mod handlers;
pub mod types;

pub use context::JobContext;
pub use types::{EvaluateSignalJob, FetchSnapshotJob, StoreSignalJob};
