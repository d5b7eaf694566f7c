//! Signal evaluation interfaces.

pub mod aggregation;
pub mod classifier;
pub mod derive;
pub mod engine;
pub mod pipeline;
pub mod scoring;

pub use aggregation::{Aggregator, MarketBias, MarketSummary, OverallLabel, SourceSignal};
pub use engine::SignalEngine;
pub use pipeline::{Factor, Guard, ScoringPipeline, ValidSnapshot};
