//! Ownership of loaded monitoring points and their observation series.

use std::collections::BTreeMap;

use crate::data::{MonitoringPoint, Observation};
use crate::error::DatasetError;

/// One point together with its ascending-ordered observation series.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub point: MonitoringPoint,
    pub observations: Vec<Observation>,
}

/// Holds every in-scope monitoring point for the duration of a pass.
///
/// Loaded once per data refresh, read-only afterwards; a pass never mutates
/// the store. Points are keyed by name, the one identity stable across
/// passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineStore {
    points: BTreeMap<String, PointSeries>,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a point with its series, validating the ascending-timestamp
    /// precondition and name uniqueness. This is the only place ordering is
    /// enforced; the pipeline itself assumes it.
    pub fn insert(
        &mut self,
        point: MonitoringPoint,
        observations: Vec<Observation>,
    ) -> Result<(), DatasetError> {
        if self.points.contains_key(&point.name) {
            return Err(DatasetError::DuplicatePoint { name: point.name });
        }
        for (index, pair) in observations.windows(2).enumerate() {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(DatasetError::UnsortedObservations {
                    name: point.name,
                    index: index + 1,
                });
            }
        }
        self.points.insert(point.name.clone(), PointSeries { point, observations });
        Ok(())
    }

    /// Look up one point's series by name.
    pub fn get(&self, name: &str) -> Option<&PointSeries> {
        self.points.get(name)
    }

    /// All series, ordered by point name.
    pub fn iter(&self) -> impl Iterator<Item = &PointSeries> {
        self.points.values()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GeoPosition, PointKind};
    use chrono::{Duration, TimeZone, Utc};

    fn point(name: &str) -> MonitoringPoint {
        MonitoringPoint {
            name: name.to_string(),
            position: GeoPosition { lat: 47.0, lon: 8.0, height: 430.0 },
            kind: PointKind::Height,
            zero_baseline: None,
            rolling_baseline: None,
            profile: None,
        }
    }

    fn obs(days: i64) -> Observation {
        Observation {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days),
            height: Some(10.0),
            x: None,
            y: None,
            zero_measurement: false,
            replacement_measurement: false,
            operator: None,
        }
    }

    #[test]
    fn insert_and_lookup_by_name() {
        let mut store = BaselineStore::new();
        store.insert(point("P-1"), vec![obs(0), obs(1)]).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("P-1").unwrap().observations.len(), 2);
        assert!(store.get("P-2").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut store = BaselineStore::new();
        store.insert(point("P-1"), vec![]).unwrap();

        let err = store.insert(point("P-1"), vec![]).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicatePoint { .. }));
    }

    #[test]
    fn unsorted_series_is_rejected_at_the_boundary() {
        let mut store = BaselineStore::new();
        let err = store.insert(point("P-1"), vec![obs(5), obs(1)]).unwrap_err();
        assert!(matches!(err, DatasetError::UnsortedObservations { index: 1, .. }));
    }

    #[test]
    fn equal_timestamps_are_tolerated() {
        let mut store = BaselineStore::new();
        store.insert(point("P-1"), vec![obs(1), obs(1)]).unwrap();
    }

    #[test]
    fn iteration_is_name_ordered() {
        let mut store = BaselineStore::new();
        store.insert(point("P-2"), vec![]).unwrap();
        store.insert(point("P-1"), vec![]).unwrap();

        let names: Vec<&str> = store.iter().map(|s| s.point.name.as_str()).collect();
        assert_eq!(names, vec!["P-1", "P-2"]);
    }
}
