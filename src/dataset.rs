//! Serialized dataset records and file loading.
//!
//! These types mirror the JSON dataset format produced by the survey-data
//! exporter. They are the interchange schema between the data source and
//! this core; [`Dataset::into_store`] converts them into the validated
//! runtime model.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{
    AlarmProfile, Baseline, ComponentProfile, GeoPosition, MonitoringPoint, Observation,
    PointKind, ThresholdBand,
};
use crate::error::{DatasetError, ProfileError};
use crate::store::BaselineStore;

/// A complete dataset: every monitoring point with its series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub points: Vec<PointRecord>,
}

/// One monitoring point as serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointRecord {
    pub name: String,
    pub position: PositionRecord,
    pub kind: KindRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_baseline: Option<BaselineRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_baseline: Option<BaselineRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRecord>,
    #[serde(default)]
    pub observations: Vec<ObservationRecord>,
}

/// Geodetic anchor position (degrees, meters).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionRecord {
    pub lat: f64,
    pub lon: f64,
    pub height: f64,
}

/// Dimensionality tag as serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindRecord {
    Height,
    Plane,
    HeightPlane,
}

/// A zero or rolling baseline as serialized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaselineRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    pub date: DateTime<Utc>,
}

/// Per-component threshold bands, ordered by severity level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Vec<BandRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane: Option<Vec<BandRecord>>,
}

/// One inclusive severity band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandRecord {
    pub min: f64,
    pub max: f64,
}

/// One observation as serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default)]
    pub zero_measurement: bool,
    #[serde(default)]
    pub replacement_measurement: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl Dataset {
    /// Load and parse a dataset from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a dataset from a JSON string.
    pub fn parse(content: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Convert the records into a validated [`BaselineStore`].
    ///
    /// Rejects duplicate names, non-ascending observation series and
    /// malformed profiles; everything else is tolerated per item.
    pub fn into_store(self) -> Result<BaselineStore, DatasetError> {
        let mut store = BaselineStore::new();

        for record in self.points {
            let profile = match record.profile {
                Some(profile) => Some(build_profile(&record.name, profile)?),
                None => None,
            };
            let point = MonitoringPoint {
                name: record.name,
                position: GeoPosition {
                    lat: record.position.lat,
                    lon: record.position.lon,
                    height: record.position.height,
                },
                kind: match record.kind {
                    KindRecord::Height => PointKind::Height,
                    KindRecord::Plane => PointKind::Plane,
                    KindRecord::HeightPlane => PointKind::HeightPlane,
                },
                zero_baseline: record.zero_baseline.map(into_baseline),
                rolling_baseline: record.rolling_baseline.map(into_baseline),
                profile,
            };
            let observations = record.observations.into_iter().map(into_observation).collect();
            store.insert(point, observations)?;
        }

        Ok(store)
    }
}

fn into_baseline(record: BaselineRecord) -> Baseline {
    Baseline { x: record.x, y: record.y, z: record.z, date: record.date }
}

fn into_observation(record: ObservationRecord) -> Observation {
    Observation {
        timestamp: record.timestamp,
        height: record.height,
        x: record.x,
        y: record.y,
        zero_measurement: record.zero_measurement,
        replacement_measurement: record.replacement_measurement,
        operator: record.operator,
    }
}

fn build_profile(name: &str, record: ProfileRecord) -> Result<AlarmProfile, DatasetError> {
    fn component(bands: Vec<BandRecord>) -> Result<ComponentProfile, ProfileError> {
        ComponentProfile::new(
            bands.into_iter().map(|b| ThresholdBand { min: b.min, max: b.max }).collect(),
        )
    }

    let height = record
        .height
        .map(component)
        .transpose()
        .map_err(|source| DatasetError::InvalidProfile { name: name.to_string(), source })?;
    let plane = record
        .plane
        .map(component)
        .transpose()
        .map_err(|source| DatasetError::InvalidProfile { name: name.to_string(), source })?;

    Ok(AlarmProfile { height, plane })
}
