//! Reusable derive, score, classify pipeline
//!
//! Every signal source in the engine follows the same three-stage shape:
//! derive metrics from a validated snapshot, sum a weighted factor table into
//! a clamped confidence, then walk an ordered guard list where the first
//! matching guard names the label. A concrete source is a declarative
//! configuration of this harness, not a new state machine.

use crate::models::signal::SignalLabel;
use crate::models::snapshot::{IndicatorSnapshot, SessionState};

/// Snapshot that passed required-field validation.
///
/// `price` and `baseline_price` are guaranteed positive; everything else is
/// read from `raw` with its own default-substitution rule.
#[derive(Debug, Clone, Copy)]
pub struct ValidSnapshot<'a> {
    pub price: f64,
    pub baseline_price: f64,
    pub raw: &'a IndicatorSnapshot,
}

/// One weighted contribution to the confidence score.
///
/// Returns None when the factor's input is absent, which omits the factor
/// entirely rather than penalizing it.
pub struct Factor<M> {
    pub name: &'static str,
    pub contribution: fn(&ValidSnapshot, &M, SessionState) -> Option<i32>,
}

/// One classification rule. Guards are evaluated in order and the first
/// match wins.
pub struct Guard<M> {
    pub label: SignalLabel,
    pub applies: fn(&M, i32) -> bool,
    pub rationale: fn(&ValidSnapshot, &M, i32) -> String,
}

/// A complete signal source: derivation function, factor table, guard list,
/// and score bounds.
pub struct ScoringPipeline<M: 'static> {
    pub derive: fn(&ValidSnapshot) -> M,
    pub base_score: i32,
    pub score_floor: i32,
    pub score_ceiling: i32,
    pub factors: &'static [Factor<M>],
    pub guards: &'static [Guard<M>],
    pub fallback_label: SignalLabel,
    pub fallback_rationale: fn(&ValidSnapshot, &M, i32) -> String,
}

impl<M> ScoringPipeline<M> {
    pub fn derive(&self, snapshot: &ValidSnapshot) -> M {
        (self.derive)(snapshot)
    }

    /// Sum the factor table over the snapshot and clamp into the score bounds.
    pub fn score(&self, snapshot: &ValidSnapshot, metrics: &M, session: SessionState) -> i32 {
        let total: i32 = self
            .factors
            .iter()
            .filter_map(|factor| (factor.contribution)(snapshot, metrics, session))
            .sum();
        (self.base_score + total).clamp(self.score_floor, self.score_ceiling)
    }

    /// Walk the guard list in order; the first satisfied guard names the
    /// label. Falls back to the configured label when nothing matches.
    pub fn classify(
        &self,
        snapshot: &ValidSnapshot,
        metrics: &M,
        confidence: i32,
    ) -> (SignalLabel, String) {
        for guard in self.guards {
            if (guard.applies)(metrics, confidence) {
                return (guard.label, (guard.rationale)(snapshot, metrics, confidence));
            }
        }
        (
            self.fallback_label,
            (self.fallback_rationale)(snapshot, metrics, confidence),
        )
    }

    /// Run all three stages for one snapshot.
    pub fn run(
        &self,
        snapshot: &ValidSnapshot,
        session: SessionState,
    ) -> (M, i32, SignalLabel, String) {
        let metrics = self.derive(snapshot);
        let confidence = self.score(snapshot, &metrics, session);
        let (label, rationale) = self.classify(snapshot, &metrics, confidence);
        (metrics, confidence, label, rationale)
    }
}
