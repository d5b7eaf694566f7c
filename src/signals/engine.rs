//! Signal engine: validation, pipeline execution, payload assembly

use crate::models::signal::{
    DerivedMetrics, Evaluation, InsufficientDataReason, SignalLabel, SignalOutput,
};
use crate::models::snapshot::{IndicatorSnapshot, SessionState};
use crate::signals::classifier;
use crate::signals::derive::derive_price_action;
use crate::signals::pipeline::{ScoringPipeline, ValidSnapshot};
use crate::signals::scoring;
use tracing::debug;

/// The price-action source as a declarative pipeline configuration
const PRICE_ACTION: ScoringPipeline<DerivedMetrics> = ScoringPipeline {
    derive: derive_price_action,
    base_score: scoring::BASE_SCORE,
    score_floor: scoring::SCORE_FLOOR,
    score_ceiling: scoring::SCORE_CEILING,
    factors: scoring::FACTORS,
    guards: classifier::GUARDS,
    fallback_label: SignalLabel::Wait,
    fallback_rationale: classifier::wait_rationale,
};

pub struct SignalEngine;

impl SignalEngine {
    /// Evaluate one snapshot captured in one session.
    ///
    /// Pure and total: missing or non-positive required fields produce a
    /// typed InsufficientData result, everything else produces a signal.
    /// Identical input always yields an identical output.
    pub fn evaluate(snapshot: &IndicatorSnapshot, session: SessionState) -> Evaluation {
        let price = match snapshot.price {
            None => {
                return Evaluation::InsufficientData {
                    reason: InsufficientDataReason::MissingPrice,
                }
            }
            Some(p) if p <= 0.0 => {
                return Evaluation::InsufficientData {
                    reason: InsufficientDataReason::NonPositivePrice,
                }
            }
            Some(p) => p,
        };

        let baseline_price = match snapshot.baseline_price {
            None => {
                return Evaluation::InsufficientData {
                    reason: InsufficientDataReason::MissingBaseline,
                }
            }
            Some(b) if b <= 0.0 => {
                return Evaluation::InsufficientData {
                    reason: InsufficientDataReason::NonPositiveBaseline,
                }
            }
            Some(b) => b,
        };

        let valid = ValidSnapshot {
            price,
            baseline_price,
            raw: snapshot,
        };

        let (metrics, confidence, label, rationale) = PRICE_ACTION.run(&valid, session);

        debug!(
            symbol = %snapshot.symbol,
            label = ?label,
            confidence = confidence,
            "evaluated {}: {:?} (confidence {})",
            snapshot.symbol,
            label,
            confidence
        );

        Evaluation::Ready(SignalOutput {
            symbol: snapshot.symbol.clone(),
            label,
            confidence,
            rationale,
            metrics,
            price,
            session,
            volume_strength: snapshot.volume_strength.clone(),
            timestamp: snapshot.timestamp,
        })
    }
}
