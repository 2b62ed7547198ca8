//! Alarm threshold profiles and ordinal severity levels.

use serde::Serialize;
use std::fmt;

use crate::error::ProfileError;

/// Ordinal alarm severity of a delta magnitude.
///
/// Level `-1` means "undefined": no baseline, no profile, or no measured
/// component. Defined levels start at 0 and order by severity, so the
/// combined level of a multi-component point is simply the `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AlarmLevel(pub i32);

impl AlarmLevel {
    /// No baseline, profile or measurement to classify against.
    pub const UNDEFINED: AlarmLevel = AlarmLevel(-1);

    /// Whether this is a defined (>= 0) severity level.
    pub fn is_defined(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for AlarmLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_defined() {
            write!(f, "L{}", self.0)
        } else {
            write!(f, "undefined")
        }
    }
}

/// One inclusive severity band `[min, max]` in meters of delta magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    pub min: f64,
    pub max: f64,
}

impl ThresholdBand {
    /// Whether the band contains the given magnitude (inclusive bounds).
    pub fn contains(&self, magnitude: f64) -> bool {
        magnitude >= self.min && magnitude <= self.max
    }

    /// Fraction of the band consumed by the given magnitude, as a
    /// percentage. Not capped at 100; a degenerate band counts as fully
    /// consumed.
    pub fn consumed_percent(&self, magnitude: f64) -> f64 {
        let width = self.max - self.min;
        if width > 0.0 {
            (magnitude - self.min) / width * 100.0
        } else {
            100.0
        }
    }
}

/// Ordered severity bands for one component, indexed by level.
///
/// Bands are contiguous and non-overlapping by construction: band `i + 1`
/// starts exactly where band `i` ends. [`ComponentProfile::new`] enforces
/// this, so lookups are a single forward scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentProfile {
    bands: Vec<ThresholdBand>,
}

impl ComponentProfile {
    /// Build a profile from bands ordered by level, validating shape.
    pub fn new(bands: Vec<ThresholdBand>) -> Result<Self, ProfileError> {
        for (index, band) in bands.iter().enumerate() {
            if !band.min.is_finite() || !band.max.is_finite() {
                return Err(ProfileError::NonFinite { index });
            }
            if band.max <= band.min {
                return Err(ProfileError::EmptyBand { index, min: band.min, max: band.max });
            }
            if index > 0 {
                let expected = bands[index - 1].max;
                if band.min != expected {
                    return Err(ProfileError::NotContiguous { index, expected, found: band.min });
                }
            }
        }
        Ok(Self { bands })
    }

    /// The bands ordered by level.
    pub fn bands(&self) -> &[ThresholdBand] {
        &self.bands
    }

    /// The highest defined level, if any band exists.
    pub fn top_level(&self) -> Option<AlarmLevel> {
        if self.bands.is_empty() {
            None
        } else {
            Some(AlarmLevel(self.bands.len() as i32 - 1))
        }
    }
}

/// Per-component alarm threshold profile of a monitoring point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlarmProfile {
    pub height: Option<ComponentProfile>,
    pub plane: Option<ComponentProfile>,
}
