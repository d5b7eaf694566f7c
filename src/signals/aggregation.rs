//! Cross-market aggregation of per-source signals
//!
//! Rolls many evaluated sources into one summary: per-source label and
//! confidence pairs, bias counts that always sum to the source count, a
//! five-valued overall label, and a signed confidence-weighted trend
//! percentage in [-100, 100].

use crate::models::signal::{SignalLabel, SignalOutput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directional bucket a single label falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketBias {
    Bullish,
    Bearish,
    Neutral,
}

impl MarketBias {
    pub fn from_label(label: SignalLabel) -> Self {
        match label {
            SignalLabel::Buy | SignalLabel::StrongBuy => Self::Bullish,
            SignalLabel::Sell | SignalLabel::StrongSell => Self::Bearish,
            SignalLabel::Wait | SignalLabel::Mixed => Self::Neutral,
        }
    }
}

/// Five-valued market-wide verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallLabel {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

/// Per-source entry carried in the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSignal {
    pub symbol: String,
    pub label: SignalLabel,
    pub confidence: i32,
}

/// Combined view over all evaluated sources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub sources: Vec<SourceSignal>,
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
    pub overall: OverallLabel,
    pub trend_pct: f64,
    pub generated_at: DateTime<Utc>,
}

const STRONG_TREND_THRESHOLD: f64 = 60.0;
const TREND_THRESHOLD: f64 = 20.0;

pub struct Aggregator;

impl Aggregator {
    /// Combine per-source signals into one market summary.
    ///
    /// Trend is confidence weighted: each bullish source pushes the trend up
    /// by its confidence, each bearish source pulls it down, neutral sources
    /// dilute it. The result is naturally bounded in [-100, 100].
    pub fn summarize(signals: &[SignalOutput]) -> MarketSummary {
        let mut bullish = 0usize;
        let mut bearish = 0usize;
        let mut neutral = 0usize;
        let mut weighted = 0i64;
        let mut total_confidence = 0i64;

        let sources: Vec<SourceSignal> = signals
            .iter()
            .map(|signal| {
                let confidence = i64::from(signal.confidence);
                total_confidence += confidence;
                match MarketBias::from_label(signal.label) {
                    MarketBias::Bullish => {
                        bullish += 1;
                        weighted += confidence;
                    }
                    MarketBias::Bearish => {
                        bearish += 1;
                        weighted -= confidence;
                    }
                    MarketBias::Neutral => {
                        neutral += 1;
                    }
                }
                SourceSignal {
                    symbol: signal.symbol.clone(),
                    label: signal.label,
                    confidence: signal.confidence,
                }
            })
            .collect();

        let trend_pct = if total_confidence > 0 {
            100.0 * weighted as f64 / total_confidence as f64
        } else {
            0.0
        };

        let overall = if trend_pct >= STRONG_TREND_THRESHOLD {
            OverallLabel::StrongBullish
        } else if trend_pct >= TREND_THRESHOLD {
            OverallLabel::Bullish
        } else if trend_pct <= -STRONG_TREND_THRESHOLD {
            OverallLabel::StrongBearish
        } else if trend_pct <= -TREND_THRESHOLD {
            OverallLabel::Bearish
        } else {
            OverallLabel::Neutral
        };

        MarketSummary {
            sources,
            bullish,
            bearish,
            neutral,
            overall,
            trend_pct,
            generated_at: Utc::now(),
        }
    }
}
