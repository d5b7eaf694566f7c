//! Unit tests for the ordered guard classifier

use tickpulse::models::signal::{DerivedMetrics, SignalLabel};
use tickpulse::models::snapshot::IndicatorSnapshot;
use tickpulse::signals::classifier::{wait_rationale, GUARDS};
use tickpulse::signals::derive::derive_price_action;
use tickpulse::signals::pipeline::{ScoringPipeline, ValidSnapshot};
use tickpulse::signals::scoring::{BASE_SCORE, FACTORS, SCORE_CEILING, SCORE_FLOOR};

const PIPELINE: ScoringPipeline<DerivedMetrics> = ScoringPipeline {
    derive: derive_price_action,
    base_score: BASE_SCORE,
    score_floor: SCORE_FLOOR,
    score_ceiling: SCORE_CEILING,
    factors: FACTORS,
    guards: GUARDS,
    fallback_label: SignalLabel::Wait,
    fallback_rationale: wait_rationale,
};

fn directional_metrics(above: bool, trend_strength: f64) -> DerivedMetrics {
    DerivedMetrics {
        reference_distance_pct: 2.0,
        baseline_distance_pct: 3.0,
        above_reference: above,
        above_baseline: above,
        momentum_score: 50.0,
        volume_pressure: 50.0,
        confluence: Some(true),
        trend_strength,
    }
}

fn conflicting_metrics() -> DerivedMetrics {
    DerivedMetrics {
        reference_distance_pct: 1.0,
        baseline_distance_pct: 1.0,
        above_reference: false,
        above_baseline: true,
        momentum_score: 50.0,
        volume_pressure: 50.0,
        confluence: Some(false),
        trend_strength: 0.0,
    }
}

fn classify(metrics: &DerivedMetrics, confidence: i32) -> (SignalLabel, String) {
    let raw = IndicatorSnapshot::new("BTC-USD".to_string(), 100.0).with_baseline_price(97.0);
    let snap = ValidSnapshot {
        price: 100.0,
        baseline_price: 97.0,
        raw: &raw,
    };
    PIPELINE.classify(&snap, metrics, confidence)
}

#[test]
fn strong_buy_needs_confidence_and_trend() {
    let (label, rationale) = classify(&directional_metrics(true, 3.0), 80);
    assert_eq!(label, SignalLabel::StrongBuy);
    assert!(rationale.contains("confidence 80"));
}

#[test]
fn strong_buy_falls_back_to_buy_on_weak_trend() {
    let (label, _) = classify(&directional_metrics(true, 0.5), 80);
    assert_eq!(label, SignalLabel::Buy);
}

#[test]
fn strong_sell_needs_confidence_and_trend() {
    let (label, rationale) = classify(&directional_metrics(false, 3.0), 80);
    assert_eq!(label, SignalLabel::StrongSell);
    assert!(rationale.contains("bearish"));
}

#[test]
fn actionable_confidence_yields_buy_or_sell() {
    let (label, _) = classify(&directional_metrics(true, 0.2), 60);
    assert_eq!(label, SignalLabel::Buy);

    let (label, _) = classify(&directional_metrics(false, 0.2), 60);
    assert_eq!(label, SignalLabel::Sell);
}

#[test]
fn disagreeing_references_yield_mixed() {
    // Mixed wins regardless of confidence
    let (label, rationale) = classify(&conflicting_metrics(), 90);
    assert_eq!(label, SignalLabel::Mixed);
    assert!(rationale.contains("disagree"));

    let (label, _) = classify(&conflicting_metrics(), 25);
    assert_eq!(label, SignalLabel::Mixed);
}

#[test]
fn low_confidence_directional_input_waits() {
    let (label, rationale) = classify(&directional_metrics(true, 3.0), 40);
    assert_eq!(label, SignalLabel::Wait);
    assert!(rationale.contains("waiting"));

    let (label, _) = classify(&directional_metrics(false, 3.0), 40);
    assert_eq!(label, SignalLabel::Wait);
}

#[test]
fn first_matching_guard_wins() {
    // Qualifies for both the strong and the plain guard; order picks strong
    let metrics = directional_metrics(true, 3.0);
    let strong_guard = &GUARDS[0];
    let plain_guard = &GUARDS[2];
    assert!((strong_guard.applies)(&metrics, 80));
    assert!((plain_guard.applies)(&metrics, 80));

    let (label, _) = classify(&metrics, 80);
    assert_eq!(label, SignalLabel::StrongBuy);
}

#[test]
fn baseline_only_direction_without_reference() {
    let mut metrics = directional_metrics(true, 3.0);
    metrics.confluence = None;
    metrics.above_reference = false;

    let (label, _) = classify(&metrics, 80);
    assert_eq!(label, SignalLabel::StrongBuy);

    metrics.above_baseline = false;
    let (label, _) = classify(&metrics, 80);
    assert_eq!(label, SignalLabel::StrongSell);
}

#[test]
fn threshold_boundaries_are_inclusive() {
    let (label, _) = classify(&directional_metrics(true, 0.8), 75);
    assert_eq!(label, SignalLabel::StrongBuy);

    let (label, _) = classify(&directional_metrics(true, 0.2), 55);
    assert_eq!(label, SignalLabel::Buy);

    let (label, _) = classify(&directional_metrics(true, 0.2), 54);
    assert_eq!(label, SignalLabel::Wait);
}
