//! Ordered guard list for the price-action signal classifier

use crate::models::signal::{DerivedMetrics, SignalLabel};
use crate::signals::pipeline::{Guard, ValidSnapshot};

const STRONG_CONFIDENCE: i32 = 75;
const ACTIONABLE_CONFIDENCE: i32 = 55;
const STRONG_TREND: f64 = 0.8;

/// Both references agree bullish, or price is above baseline when no
/// reference was supplied.
fn bullish(metrics: &DerivedMetrics) -> bool {
    match metrics.confluence {
        Some(_) => metrics.above_baseline && metrics.above_reference,
        None => metrics.above_baseline,
    }
}

fn bearish(metrics: &DerivedMetrics) -> bool {
    match metrics.confluence {
        Some(_) => !metrics.above_baseline && !metrics.above_reference,
        None => !metrics.above_baseline,
    }
}

fn direction_word(metrics: &DerivedMetrics) -> &'static str {
    if metrics.above_baseline {
        "above"
    } else {
        "below"
    }
}

/// Guards in precedence order; the first satisfied guard wins. The harness
/// falls back to WAIT when none fire.
pub const GUARDS: &[Guard<DerivedMetrics>] = &[
    Guard {
        label: SignalLabel::StrongBuy,
        applies: |metrics, confidence| {
            bullish(metrics)
                && confidence >= STRONG_CONFIDENCE
                && metrics.trend_strength >= STRONG_TREND
        },
        rationale: |_, metrics, confidence| {
            format!(
                "price {:.2}% above baseline, strong bullish trend confirmed (confidence {})",
                metrics.baseline_distance_pct, confidence
            )
        },
    },
    Guard {
        label: SignalLabel::StrongSell,
        applies: |metrics, confidence| {
            bearish(metrics)
                && confidence >= STRONG_CONFIDENCE
                && metrics.trend_strength >= STRONG_TREND
        },
        rationale: |_, metrics, confidence| {
            format!(
                "price {:.2}% below baseline, strong bearish trend confirmed (confidence {})",
                metrics.baseline_distance_pct, confidence
            )
        },
    },
    Guard {
        label: SignalLabel::Buy,
        applies: |metrics, confidence| bullish(metrics) && confidence >= ACTIONABLE_CONFIDENCE,
        rationale: |_, metrics, confidence| {
            format!(
                "price {:.2}% above baseline, bullish bias (confidence {})",
                metrics.baseline_distance_pct, confidence
            )
        },
    },
    Guard {
        label: SignalLabel::Sell,
        applies: |metrics, confidence| bearish(metrics) && confidence >= ACTIONABLE_CONFIDENCE,
        rationale: |_, metrics, confidence| {
            format!(
                "price {:.2}% below baseline, bearish bias (confidence {})",
                metrics.baseline_distance_pct, confidence
            )
        },
    },
    Guard {
        label: SignalLabel::Mixed,
        applies: |metrics, _| !bullish(metrics) && !bearish(metrics),
        rationale: |_, metrics, _| {
            format!(
                "references disagree, price {} baseline but not reference, no clear direction",
                direction_word(metrics)
            )
        },
    },
];

/// Rationale for the WAIT fallback when no guard fires
pub fn wait_rationale(_snapshot: &ValidSnapshot, metrics: &DerivedMetrics, confidence: i32) -> String {
    format!(
        "confidence {} below actionable threshold, price {} baseline, waiting",
        confidence,
        direction_word(metrics)
    )
}
