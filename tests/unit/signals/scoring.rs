//! Unit tests for the weighted factor table

use tickpulse::models::signal::{DerivedMetrics, SignalLabel};
use tickpulse::models::snapshot::{IndicatorSnapshot, SessionState};
use tickpulse::signals::classifier::{wait_rationale, GUARDS};
use tickpulse::signals::derive::derive_price_action;
use tickpulse::signals::pipeline::{Factor, ScoringPipeline, ValidSnapshot};
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

fn factor(name: &str) -> &'static Factor<DerivedMetrics> {
    FACTORS
        .iter()
        .find(|f| f.name == name)
        .expect("factor exists")
}

fn metrics_with(
    reference_distance_pct: f64,
    baseline_distance_pct: f64,
    confluence: Option<bool>,
) -> DerivedMetrics {
    DerivedMetrics {
        reference_distance_pct,
        baseline_distance_pct,
        above_reference: true,
        above_baseline: true,
        momentum_score: 50.0,
        volume_pressure: 50.0,
        confluence,
        trend_strength: 1.0,
    }
}

fn snapshot(price: f64, baseline: f64) -> IndicatorSnapshot {
    IndicatorSnapshot::new("BTC-USD".to_string(), price).with_baseline_price(baseline)
}

fn valid(raw: &IndicatorSnapshot) -> ValidSnapshot<'_> {
    ValidSnapshot {
        price: raw.price.expect("test snapshot has price"),
        baseline_price: raw.baseline_price.expect("test snapshot has baseline"),
        raw,
    }
}

#[test]
fn reference_position_tiers() {
    let raw = snapshot(100.0, 95.0);
    let snap = valid(&raw);
    let contribute = factor("reference_position").contribution;

    let cases = [(2.0, 25), (1.0, 18), (0.5, 12), (0.1, 5)];
    for (distance, expected) in cases {
        let metrics = metrics_with(distance, 5.0, Some(true));
        assert_eq!(contribute(&snap, &metrics, SessionState::Live), Some(expected));
    }
}

#[test]
fn reference_position_is_omitted_without_a_reference() {
    let raw = snapshot(100.0, 95.0);
    let snap = valid(&raw);
    let metrics = metrics_with(0.0, 5.0, None);
    assert_eq!(
        (factor("reference_position").contribution)(&snap, &metrics, SessionState::Live),
        None
    );
}

#[test]
fn baseline_alignment_tiers() {
    let raw = snapshot(100.0, 95.0);
    let snap = valid(&raw);
    let contribute = factor("baseline_alignment").contribution;

    let cases = [(3.0, 20), (1.5, 14), (0.7, 8), (0.3, 0), (0.1, -5)];
    for (distance, expected) in cases {
        let metrics = metrics_with(2.0, distance, Some(true));
        assert_eq!(contribute(&snap, &metrics, SessionState::Live), Some(expected));
    }
}

#[test]
fn volume_confirmation_tiers() {
    let contribute = factor("volume_confirmation").contribution;
    let metrics = metrics_with(2.0, 5.0, Some(true));

    let cases = [(1.6, 18), (1.2, 12), (0.8, 6), (0.4, -4)];
    for (ratio, expected) in cases {
        let raw = snapshot(100.0, 95.0).with_volume_ratio(ratio);
        let snap = valid(&raw);
        assert_eq!(contribute(&snap, &metrics, SessionState::Live), Some(expected));
    }

    let raw = snapshot(100.0, 95.0);
    let snap = valid(&raw);
    assert_eq!(contribute(&snap, &metrics, SessionState::Live), None);
}

#[test]
fn confluence_rewards_agreement_and_penalizes_conflict() {
    let raw = snapshot(100.0, 95.0);
    let snap = valid(&raw);
    let contribute = factor("confluence").contribution;

    assert_eq!(
        contribute(&snap, &metrics_with(2.0, 5.0, Some(true)), SessionState::Live),
        Some(12)
    );
    assert_eq!(
        contribute(&snap, &metrics_with(2.0, 5.0, Some(false)), SessionState::Live),
        Some(-3)
    );
    assert_eq!(
        contribute(&snap, &metrics_with(0.0, 5.0, None), SessionState::Live),
        None
    );
}

#[test]
fn session_contribution_per_state() {
    let raw = snapshot(100.0, 95.0);
    let snap = valid(&raw);
    let metrics = metrics_with(2.0, 5.0, Some(true));
    let contribute = factor("session").contribution;

    assert_eq!(contribute(&snap, &metrics, SessionState::Live), Some(10));
    assert_eq!(contribute(&snap, &metrics, SessionState::Closed), Some(-8));
    assert_eq!(contribute(&snap, &metrics, SessionState::Offline), Some(-12));
}

#[test]
fn score_clamps_at_the_ceiling() {
    // All factors maxed: 40 + 25 + 20 + 18 + 12 + 10 = 125
    let raw = snapshot(100.0, 95.0)
        .with_reference_price(98.0)
        .with_volume_ratio(1.6);
    let snap = valid(&raw);
    let metrics = derive_price_action(&snap);

    assert_eq!(PIPELINE.score(&snap, &metrics, SessionState::Live), 95);
}

#[test]
fn score_clamps_at_the_floor() {
    // 40 - 5 - 4 - 12 = 19, clamped up to 20
    let raw = snapshot(100.0, 100.05).with_volume_ratio(0.4);
    let snap = valid(&raw);
    let metrics = derive_price_action(&snap);

    assert_eq!(PIPELINE.score(&snap, &metrics, SessionState::Offline), 20);
}

#[test]
fn absent_volume_omits_the_factor_entirely() {
    let with_volume = snapshot(100.0, 103.0).with_volume_ratio(0.4);
    let without_volume = snapshot(100.0, 103.0);

    let snap_with = valid(&with_volume);
    let snap_without = valid(&without_volume);
    let metrics_with_vol = derive_price_action(&snap_with);
    let metrics_without_vol = derive_price_action(&snap_without);

    let scored_with = PIPELINE.score(&snap_with, &metrics_with_vol, SessionState::Live);
    let scored_without = PIPELINE.score(&snap_without, &metrics_without_vol, SessionState::Live);

    // Omission is neutral, a weak ratio is a penalty
    assert_eq!(scored_without - scored_with, 4);
}

#[test]
fn session_state_shifts_the_score() {
    let raw = snapshot(100.0, 103.0);
    let snap = valid(&raw);
    let metrics = derive_price_action(&snap);

    let live = PIPELINE.score(&snap, &metrics, SessionState::Live);
    let closed = PIPELINE.score(&snap, &metrics, SessionState::Closed);
    let offline = PIPELINE.score(&snap, &metrics, SessionState::Offline);

    assert_eq!(live - closed, 18);
    assert_eq!(live - offline, 22);
}
