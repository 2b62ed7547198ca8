//! A single timestamped measurement of a monitoring point.

use chrono::{DateTime, Utc};

/// One observation of a monitoring point.
///
/// Components are nullable independently: a levelling campaign records only
/// `height`, a tachymetric one may record only `x`/`y`. Observations for a
/// point are stored in ascending timestamp order; that ordering is a
/// precondition of the pipeline, checked at the dataset ingest boundary and
/// not repaired afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    /// Measured height in meters, if the campaign measured it.
    pub height: Option<f64>,
    /// Measured plane coordinates in meters, if the campaign measured them.
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Marks the zero measurement the zero baseline was derived from.
    pub zero_measurement: bool,
    /// Marks a replacement measurement after a point was re-established.
    pub replacement_measurement: bool,
    pub operator: Option<String>,
}

impl Observation {
    /// Whether the observation measured the full plane component.
    pub fn has_plane(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    /// Whether the observation carries any measured component at all.
    ///
    /// Observations without one are dropped by the temporal filter.
    pub fn has_any_measurement(&self) -> bool {
        self.height.is_some() || self.x.is_some() || self.y.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(timestamp: DateTime<Utc>) -> Observation {
        Observation {
            timestamp,
            height: None,
            x: None,
            y: None,
            zero_measurement: false,
            replacement_measurement: false,
            operator: None,
        }
    }

    #[test]
    fn empty_observation_has_no_measurement() {
        let obs = bare(Utc::now());
        assert!(!obs.has_any_measurement());
        assert!(!obs.has_plane());
    }

    #[test]
    fn single_plane_axis_is_not_a_plane_measurement() {
        let obs = Observation { x: Some(4.2), ..bare(Utc::now()) };
        assert!(obs.has_any_measurement());
        assert!(!obs.has_plane());
    }
}
