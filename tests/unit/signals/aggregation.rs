//! Unit tests for cross-market aggregation

use chrono::{TimeZone, Utc};
use tickpulse::models::signal::{DerivedMetrics, SignalLabel, SignalOutput};
use tickpulse::models::snapshot::SessionState;
use tickpulse::signals::aggregation::{Aggregator, MarketBias, OverallLabel};

fn output(symbol: &str, label: SignalLabel, confidence: i32) -> SignalOutput {
    SignalOutput {
        symbol: symbol.to_string(),
        label,
        confidence,
        rationale: "test".to_string(),
        metrics: DerivedMetrics {
            reference_distance_pct: 0.0,
            baseline_distance_pct: 1.0,
            above_reference: false,
            above_baseline: true,
            momentum_score: 50.0,
            volume_pressure: 50.0,
            confluence: None,
            trend_strength: 1.0,
        },
        price: 100.0,
        session: SessionState::Live,
        volume_strength: None,
        timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn bias_groups_labels_into_three_buckets() {
    assert_eq!(MarketBias::from_label(SignalLabel::Buy), MarketBias::Bullish);
    assert_eq!(
        MarketBias::from_label(SignalLabel::StrongBuy),
        MarketBias::Bullish
    );
    assert_eq!(MarketBias::from_label(SignalLabel::Sell), MarketBias::Bearish);
    assert_eq!(
        MarketBias::from_label(SignalLabel::StrongSell),
        MarketBias::Bearish
    );
    assert_eq!(MarketBias::from_label(SignalLabel::Wait), MarketBias::Neutral);
    assert_eq!(MarketBias::from_label(SignalLabel::Mixed), MarketBias::Neutral);
}

#[test]
fn counts_always_sum_to_source_count() {
    let labels = [
        SignalLabel::Buy,
        SignalLabel::StrongBuy,
        SignalLabel::Sell,
        SignalLabel::StrongSell,
        SignalLabel::Wait,
        SignalLabel::Mixed,
        SignalLabel::Buy,
        SignalLabel::Sell,
        SignalLabel::Wait,
        SignalLabel::Mixed,
        SignalLabel::StrongBuy,
        SignalLabel::StrongSell,
        SignalLabel::Buy,
        SignalLabel::Wait,
    ];
    let signals: Vec<SignalOutput> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| output(&format!("SYM-{}", i), *label, 60))
        .collect();

    let summary = Aggregator::summarize(&signals);

    assert_eq!(summary.sources.len(), 14);
    assert_eq!(summary.bullish + summary.bearish + summary.neutral, 14);
    assert_eq!(summary.bullish, 5);
    assert_eq!(summary.bearish, 4);
    assert_eq!(summary.neutral, 5);
}

#[test]
fn trend_is_bounded() {
    let signals = vec![
        output("A", SignalLabel::StrongBuy, 95),
        output("B", SignalLabel::StrongSell, 95),
        output("C", SignalLabel::Wait, 20),
    ];
    let summary = Aggregator::summarize(&signals);
    assert!((-100.0..=100.0).contains(&summary.trend_pct));
}

#[test]
fn unanimous_bullish_market_is_strong_bullish() {
    let signals = vec![
        output("A", SignalLabel::Buy, 70),
        output("B", SignalLabel::StrongBuy, 95),
    ];
    let summary = Aggregator::summarize(&signals);

    assert_eq!(summary.trend_pct, 100.0);
    assert_eq!(summary.overall, OverallLabel::StrongBullish);
}

#[test]
fn unanimous_bearish_market_is_strong_bearish() {
    let signals = vec![
        output("A", SignalLabel::Sell, 70),
        output("B", SignalLabel::StrongSell, 95),
    ];
    let summary = Aggregator::summarize(&signals);

    assert_eq!(summary.trend_pct, -100.0);
    assert_eq!(summary.overall, OverallLabel::StrongBearish);
}

#[test]
fn balanced_market_is_neutral() {
    let signals = vec![
        output("A", SignalLabel::Buy, 60),
        output("B", SignalLabel::Sell, 60),
    ];
    let summary = Aggregator::summarize(&signals);

    assert_eq!(summary.trend_pct, 0.0);
    assert_eq!(summary.overall, OverallLabel::Neutral);
}

#[test]
fn confidence_weights_the_trend() {
    // 100 * (95 - 20) / 115 ~ 65.2, past the strong threshold
    let signals = vec![
        output("A", SignalLabel::Buy, 95),
        output("B", SignalLabel::Sell, 20),
    ];
    let summary = Aggregator::summarize(&signals);

    assert!(summary.trend_pct > 60.0);
    assert_eq!(summary.overall, OverallLabel::StrongBullish);
}

#[test]
fn neutral_sources_dilute_the_trend() {
    let lean = vec![
        output("A", SignalLabel::Buy, 60),
        output("B", SignalLabel::Wait, 60),
        output("C", SignalLabel::Wait, 60),
    ];
    let summary = Aggregator::summarize(&lean);

    // 100 * 60 / 180 ~ 33.3: bullish but not strongly
    assert!(summary.trend_pct > 20.0 && summary.trend_pct < 60.0);
    assert_eq!(summary.overall, OverallLabel::Bullish);
}

#[test]
fn empty_input_yields_a_neutral_summary() {
    let summary = Aggregator::summarize(&[]);

    assert!(summary.sources.is_empty());
    assert_eq!(summary.bullish + summary.bearish + summary.neutral, 0);
    assert_eq!(summary.trend_pct, 0.0);
    assert_eq!(summary.overall, OverallLabel::Neutral);
}

#[test]
fn sources_preserve_per_signal_detail() {
    let signals = vec![output("BTC-USD", SignalLabel::StrongBuy, 95)];
    let summary = Aggregator::summarize(&signals);

    assert_eq!(summary.sources[0].symbol, "BTC-USD");
    assert_eq!(summary.sources[0].label, SignalLabel::StrongBuy);
    assert_eq!(summary.sources[0].confidence, 95);
}
