//! Baseline-relative and consecutive deltas for filtered observations.
//!
//! All deltas are physical units (meters). Visualization scaling is applied
//! downstream, where a delta feeds spatial layout ([`DeltaSet::magnified`]);
//! classification always consumes the unscaled values.

use crate::data::{Baseline, Observation};

/// Signed plane displacement in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PlaneDelta {
    /// Planar displacement magnitude.
    pub fn magnitude(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Per-component deltas of one observation against one reference.
///
/// A component is `Some` iff both operands carry it: an absent baseline
/// component or an unmeasured observation component yields `None`, never
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeltaSet {
    /// Signed height delta in meters.
    pub height: Option<f64>,
    pub plane: Option<PlaneDelta>,
}

impl DeltaSet {
    /// Largest available component magnitude, `None` if no component is.
    pub fn max_magnitude(&self) -> Option<f64> {
        let height = self.height.map(f64::abs);
        let plane = self.plane.map(|p| p.magnitude());
        match (height, plane) {
            (Some(h), Some(p)) => Some(h.max(p)),
            (Some(h), None) => Some(h),
            (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }

    /// The delta scaled by the visualization magnification constant.
    ///
    /// Only for spatial layout (marker displacement offsets). Threshold
    /// comparison must use the unscaled set.
    pub fn magnified(&self, factor: f64) -> DeltaSet {
        DeltaSet {
            height: self.height.map(|h| h * factor),
            plane: self.plane.map(|p| PlaneDelta { dx: p.dx * factor, dy: p.dy * factor }),
        }
    }
}

/// All deltas derived for one filtered observation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeltaResult {
    pub vs_zero: DeltaSet,
    pub vs_rolling: DeltaSet,
    /// Against the previous filtered observation; empty for the first.
    pub vs_previous: DeltaSet,
}

fn against_baseline(obs: &Observation, baseline: Option<&Baseline>) -> DeltaSet {
    let Some(baseline) = baseline else {
        return DeltaSet::default();
    };

    let height = match (obs.height, baseline.z) {
        (Some(h), Some(z)) => Some(h - z),
        _ => None,
    };
    let plane = match (obs.x, obs.y, baseline.x, baseline.y) {
        (Some(x), Some(y), Some(bx), Some(by)) => Some(PlaneDelta { dx: x - bx, dy: y - by }),
        _ => None,
    };

    DeltaSet { height, plane }
}

fn against_previous(obs: &Observation, previous: &Observation) -> DeltaSet {
    let height = match (obs.height, previous.height) {
        (Some(h), Some(p)) => Some(h - p),
        _ => None,
    };
    let plane = match (obs.x, obs.y, previous.x, previous.y) {
        (Some(x), Some(y), Some(px), Some(py)) => Some(PlaneDelta { dx: x - px, dy: y - py }),
        _ => None,
    };

    DeltaSet { height, plane }
}

/// Compute deltas for a filtered, ascending-ordered observation sequence.
pub fn compute_deltas(
    filtered: &[&Observation],
    zero: Option<&Baseline>,
    rolling: Option<&Baseline>,
) -> Vec<DeltaResult> {
    debug_assert!(
        filtered.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp),
        "filtered observations must be in ascending timestamp order"
    );

    filtered
        .iter()
        .enumerate()
        .map(|(i, obs)| DeltaResult {
            vs_zero: against_baseline(obs, zero),
            vs_rolling: against_baseline(obs, rolling),
            vs_previous: if i > 0 {
                against_previous(obs, filtered[i - 1])
            } else {
                DeltaSet::default()
            },
        })
        .collect()
}
