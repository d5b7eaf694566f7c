//! Weighted factor table for the price-action confidence score

use crate::models::signal::DerivedMetrics;
use crate::models::snapshot::SessionState;
use crate::signals::pipeline::{Factor, ValidSnapshot};

pub const BASE_SCORE: i32 = 40;
pub const SCORE_FLOOR: i32 = 20;
pub const SCORE_CEILING: i32 = 95;

/// Factor contributions in evaluation order. Absent optional inputs omit
/// their factor instead of penalizing the score.
pub const FACTORS: &[Factor<DerivedMetrics>] = &[
    Factor {
        name: "reference_position",
        contribution: reference_position,
    },
    Factor {
        name: "baseline_alignment",
        contribution: baseline_alignment,
    },
    Factor {
        name: "volume_confirmation",
        contribution: volume_confirmation,
    },
    Factor {
        name: "confluence",
        contribution: confluence,
    },
    Factor {
        name: "session",
        contribution: session,
    },
];

fn reference_position(
    _snapshot: &ValidSnapshot,
    metrics: &DerivedMetrics,
    _session: SessionState,
) -> Option<i32> {
    // Confluence presence doubles as the reference-present marker
    metrics.confluence?;
    let distance = metrics.reference_distance_pct;
    Some(if distance >= 1.5 {
        25
    } else if distance >= 0.8 {
        18
    } else if distance >= 0.3 {
        12
    } else {
        5
    })
}

fn baseline_alignment(
    _snapshot: &ValidSnapshot,
    metrics: &DerivedMetrics,
    _session: SessionState,
) -> Option<i32> {
    let distance = metrics.baseline_distance_pct;
    Some(if distance >= 2.0 {
        20
    } else if distance >= 1.0 {
        14
    } else if distance >= 0.5 {
        8
    } else if distance < 0.15 {
        -5
    } else {
        0
    })
}

fn volume_confirmation(
    snapshot: &ValidSnapshot,
    _metrics: &DerivedMetrics,
    _session: SessionState,
) -> Option<i32> {
    let ratio = snapshot.raw.volume_ratio?;
    Some(if ratio >= 1.5 {
        18
    } else if ratio >= 1.0 {
        12
    } else if ratio >= 0.7 {
        6
    } else {
        -4
    })
}

fn confluence(
    _snapshot: &ValidSnapshot,
    metrics: &DerivedMetrics,
    _session: SessionState,
) -> Option<i32> {
    Some(if metrics.confluence? { 12 } else { -3 })
}

fn session(
    _snapshot: &ValidSnapshot,
    _metrics: &DerivedMetrics,
    session: SessionState,
) -> Option<i32> {
    Some(match session {
        SessionState::Live => 10,
        SessionState::Closed => -8,
        SessionState::Offline => -12,
    })
}
