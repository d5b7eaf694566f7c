//! Metric derivation for the price-action signal source
//!
//! Total function over a validated snapshot: optional inputs substitute
//! documented defaults instead of failing.

use crate::models::signal::DerivedMetrics;
use crate::signals::pipeline::ValidSnapshot;

/// Neutral midpoint used when range or volume data is unavailable
pub const NEUTRAL_MIDPOINT: f64 = 50.0;

/// Derive the full metrics record from one validated snapshot.
///
/// Distances are percentage absolute distances. Momentum is the position of
/// price within the [low, high] band, defaulting to the midpoint when the
/// band is absent or degenerate (high <= low counts as degenerate; an
/// inverted band is treated as absent). Volume pressure is volumeRatio * 50
/// saturating at 100.
pub fn derive_price_action(snapshot: &ValidSnapshot) -> DerivedMetrics {
    let price = snapshot.price;
    let baseline = snapshot.baseline_price;
    let reference = snapshot.raw.reference_price.filter(|r| *r > 0.0);

    let reference_distance_pct = match reference {
        Some(r) => (price - r).abs() / r * 100.0,
        None => 0.0,
    };
    let baseline_distance_pct = (price - baseline).abs() / baseline * 100.0;

    let above_reference = reference.map(|r| price > r).unwrap_or(false);
    let above_baseline = price > baseline;

    let momentum_score = match (snapshot.raw.high, snapshot.raw.low) {
        (Some(high), Some(low)) if high > low => {
            ((price - low) / (high - low) * 100.0).clamp(0.0, 100.0)
        }
        _ => NEUTRAL_MIDPOINT,
    };

    let volume_pressure = match snapshot.raw.volume_ratio {
        Some(ratio) => (ratio * 50.0).clamp(0.0, 100.0),
        None => NEUTRAL_MIDPOINT,
    };

    // Agreement only means anything when both references exist
    let confluence = reference.map(|_| above_reference == above_baseline);

    let trend_strength = match confluence {
        Some(true) => (reference_distance_pct + baseline_distance_pct) / 2.0,
        _ => (reference_distance_pct - baseline_distance_pct).abs(),
    };

    DerivedMetrics {
        reference_distance_pct,
        baseline_distance_pct,
        above_reference,
        above_baseline,
        momentum_score,
        volume_pressure,
        confluence,
        trend_strength,
    }
}
