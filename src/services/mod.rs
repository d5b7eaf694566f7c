//! Snapshot acquisition services

pub mod cached_provider;
pub mod market_data;
pub mod rest_provider;

pub use cached_provider::CachedSnapshotProvider;
pub use market_data::SnapshotProvider;
pub use rest_provider::RestSnapshotProvider;
