//! Indicator snapshot input models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session phase reported by the data source at snapshot time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionState {
    Live,
    Closed,
    Offline,
}

/// Single point-in-time reading for one market source.
///
/// Only `price` and `baseline_price` are required for evaluation; everything
/// else degrades gracefully when absent. Fields arrive as options so a
/// partial upstream payload still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_strength: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl IndicatorSnapshot {
    pub fn new(symbol: String, price: f64) -> Self {
        Self {
            symbol,
            price: Some(price),
            reference_price: None,
            baseline_price: None,
            open: None,
            high: None,
            low: None,
            volume_ratio: None,
            volume_strength: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_reference_price(mut self, reference_price: f64) -> Self {
        self.reference_price = Some(reference_price);
        self
    }

    pub fn with_baseline_price(mut self, baseline_price: f64) -> Self {
        self.baseline_price = Some(baseline_price);
        self
    }

    pub fn with_range(mut self, open: f64, high: f64, low: f64) -> Self {
        self.open = Some(open);
        self.high = Some(high);
        self.low = Some(low);
        self
    }

    pub fn with_volume_ratio(mut self, volume_ratio: f64) -> Self {
        self.volume_ratio = Some(volume_ratio);
        self
    }

    pub fn with_volume_strength(mut self, volume_strength: String) -> Self {
        self.volume_strength = Some(volume_strength);
        self
    }
}

/// Snapshot plus the session it was captured in.
///
/// The unit a provider hands to the engine, and the value cached per symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub snapshot: IndicatorSnapshot,
    pub session: SessionState,
}
