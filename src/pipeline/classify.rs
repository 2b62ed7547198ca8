//! Ordinal alarm classification of delta magnitudes.

use serde::Serialize;

use crate::data::{AlarmLevel, AlarmProfile, ComponentProfile, PointKind};

use super::delta::DeltaSet;

/// Classification of one component's delta against its profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub level: AlarmLevel,
    /// How far the magnitude has progressed through the active band, as a
    /// percentage. May exceed 100 above the highest band; `None` when the
    /// level is undefined.
    pub consumed_percent: Option<f64>,
}

impl Classification {
    /// The undefined classification (no delta or no profile).
    pub const UNDEFINED: Classification =
        Classification { level: AlarmLevel::UNDEFINED, consumed_percent: None };
}

/// Classify one component delta against one component profile.
///
/// Returns the smallest level whose inclusive band contains `|delta|`;
/// magnitudes above the highest band map to the highest level with a
/// consumption above 100%. Monotonically non-decreasing in `|delta|` for a
/// fixed profile.
pub fn classify_component(
    delta: Option<f64>,
    profile: Option<&ComponentProfile>,
) -> Classification {
    let (Some(delta), Some(profile)) = (delta, profile) else {
        return Classification::UNDEFINED;
    };
    let Some(top_level) = profile.top_level() else {
        return Classification::UNDEFINED;
    };

    let magnitude = delta.abs();

    // Bands are contiguous, so the first band whose upper bound covers the
    // magnitude is the smallest containing level.
    for (level, band) in profile.bands().iter().enumerate() {
        if magnitude <= band.max {
            return Classification {
                level: AlarmLevel(level as i32),
                consumed_percent: Some(band.consumed_percent(magnitude)),
            };
        }
    }

    let top_band = profile.bands()[top_level.0 as usize];
    Classification {
        level: top_level,
        consumed_percent: Some(top_band.consumed_percent(magnitude)),
    }
}

/// Per-component classification of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointClassification {
    pub height: Classification,
    pub plane: Classification,
}

impl PointClassification {
    /// Combined severity: the maximum across the classified components.
    pub fn combined_level(&self) -> AlarmLevel {
        self.height.level.max(self.plane.level)
    }
}

/// Classify one observation's deltas against a point's profile.
///
/// Components the point does not measure stay undefined regardless of the
/// profile, so the combined level only reflects components the point
/// actually has.
pub fn classify_observation(
    deltas: &DeltaSet,
    profile: Option<&AlarmProfile>,
    kind: PointKind,
) -> PointClassification {
    let height_profile = profile.and_then(|p| p.height.as_ref());
    let plane_profile = profile.and_then(|p| p.plane.as_ref());

    let height = if kind.has_height() {
        classify_component(deltas.height, height_profile)
    } else {
        Classification::UNDEFINED
    };
    let plane = if kind.has_plane() {
        classify_component(deltas.plane.map(|p| p.magnitude()), plane_profile)
    } else {
        Classification::UNDEFINED
    };

    PointClassification { height, plane }
}
