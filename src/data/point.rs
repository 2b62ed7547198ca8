//! Monitoring point identity, anchor position and baselines.

use chrono::{DateTime, Utc};

use super::profile::AlarmProfile;

/// Geodetic anchor position of a monitoring point.
///
/// Latitude and longitude are in degrees, height in meters above the
/// reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
    pub height: f64,
}

/// Which components a monitoring point measures.
///
/// Height points are levelled (vertical only), plane points are measured in
/// the horizontal plane only, and combined points carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    Height,
    Plane,
    HeightPlane,
}

impl PointKind {
    /// Whether this point measures the height component.
    pub fn has_height(self) -> bool {
        matches!(self, PointKind::Height | PointKind::HeightPlane)
    }

    /// Whether this point measures the plane component.
    pub fn has_plane(self) -> bool {
        matches!(self, PointKind::Plane | PointKind::HeightPlane)
    }
}

/// A reference measurement against which later observations are differenced.
///
/// Components are nullable independently: a levelled point's baseline
/// typically carries only `z`, a plane point's only `x`/`y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub date: DateTime<Utc>,
}

impl Baseline {
    /// Whether the baseline carries a height reference.
    pub fn has_height(&self) -> bool {
        self.z.is_some()
    }

    /// Whether the baseline carries a full plane reference.
    pub fn has_plane(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

/// A single monitoring point.
///
/// The name is the point's identity: unique within a dataset and stable
/// across passes (the admission allow-list and the position cache key on
/// it). Immutable once loaded for the duration of a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringPoint {
    pub name: String,
    pub position: GeoPosition,
    pub kind: PointKind,
    pub zero_baseline: Option<Baseline>,
    pub rolling_baseline: Option<Baseline>,
    pub profile: Option<AlarmProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_kind_components() {
        assert!(PointKind::Height.has_height());
        assert!(!PointKind::Height.has_plane());
        assert!(!PointKind::Plane.has_height());
        assert!(PointKind::Plane.has_plane());
        assert!(PointKind::HeightPlane.has_height());
        assert!(PointKind::HeightPlane.has_plane());
    }

    #[test]
    fn baseline_plane_requires_both_axes() {
        let date = Utc::now();
        let full = Baseline { x: Some(1.0), y: Some(2.0), z: None, date };
        let partial = Baseline { x: Some(1.0), y: None, z: None, date };

        assert!(full.has_plane());
        assert!(!partial.has_plane());
        assert!(!full.has_height());
    }
}
