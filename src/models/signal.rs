//! Signal evaluation output models

use crate::models::snapshot::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discrete signal classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLabel {
    Wait,
    Buy,
    StrongBuy,
    Sell,
    StrongSell,
    Mixed,
}

/// Metrics derived from one snapshot, recomputed fresh per evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub reference_distance_pct: f64,
    pub baseline_distance_pct: f64,
    pub above_reference: bool,
    pub above_baseline: bool,
    pub momentum_score: f64,
    pub volume_pressure: f64,
    /// Directional agreement between the two references.
    /// None when no reference price was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confluence: Option<bool>,
    pub trend_strength: f64,
}

/// Complete evaluation payload for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalOutput {
    pub symbol: String,
    pub label: SignalLabel,
    pub confidence: i32,
    pub rationale: String,
    pub metrics: DerivedMetrics,
    pub price: f64,
    pub session: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_strength: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Why a snapshot could not be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientDataReason {
    MissingPrice,
    NonPositivePrice,
    MissingBaseline,
    NonPositiveBaseline,
}

impl InsufficientDataReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::MissingPrice => "price is missing",
            Self::NonPositivePrice => "price is not positive",
            Self::MissingBaseline => "baseline price is missing",
            Self::NonPositiveBaseline => "baseline price is not positive",
        }
    }
}

/// Evaluation result: a computed signal or a typed wait-for-data state.
///
/// Degenerate input is data, never an error, so callers can render an
/// explicit waiting state instead of a guessed label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Ready(SignalOutput),
    InsufficientData { reason: InsufficientDataReason },
}

impl Evaluation {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn signal(&self) -> Option<&SignalOutput> {
        match self {
            Self::Ready(signal) => Some(signal),
            Self::InsufficientData { .. } => None,
        }
    }
}
