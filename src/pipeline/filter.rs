//! Temporal filtering of observation series against a validity window.

use chrono::{DateTime, Utc};

use crate::data::Observation;

/// Decides whether a timestamp falls inside the currently active window.
///
/// The window itself is owned by a time-range manager outside this crate;
/// the pipeline only consults the oracle. Implemented by [`DateWindow`] and
/// by any `Fn(DateTime<Utc>) -> bool` closure.
pub trait ValidityOracle {
    /// Whether an observation at `timestamp` is inside the active window.
    fn is_valid(&self, timestamp: DateTime<Utc>) -> bool;
}

impl<F> ValidityOracle for F
where
    F: Fn(DateTime<Utc>) -> bool,
{
    fn is_valid(&self, timestamp: DateTime<Utc>) -> bool {
        self(timestamp)
    }
}

/// A concrete half-open-ended date window.
///
/// Either bound may be absent; a window with no bounds accepts everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ValidityOracle for DateWindow {
    fn is_valid(&self, timestamp: DateTime<Utc>) -> bool {
        let after_from = self.from.map_or(true, |from| timestamp >= from);
        let before_to = self.to.map_or(true, |to| timestamp <= to);
        after_from && before_to
    }
}

/// Result of filtering one point's observation series.
///
/// The containing system treats "the point has no data at all" differently
/// from "the point has data, but none inside the window", so the two empty
/// outcomes are kept distinct instead of collapsing to an empty sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome<'a> {
    /// The point has no observations at all.
    NoData,
    /// Observations exist, but none survive the window.
    OutOfWindow,
    /// In-window observations, relative order preserved.
    Window(Vec<&'a Observation>),
}

impl FilterOutcome<'_> {
    /// Number of surviving observations.
    pub fn len(&self) -> usize {
        match self {
            FilterOutcome::Window(observations) => observations.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Narrow a point's observation series to the validity window.
///
/// Preserves relative order; never reorders or deduplicates. Observations
/// carrying no measured component are dropped like out-of-window ones, per
/// item, silently, never an error.
pub fn filter_observations<'a>(
    observations: &'a [Observation],
    oracle: &dyn ValidityOracle,
) -> FilterOutcome<'a> {
    if observations.is_empty() {
        return FilterOutcome::NoData;
    }

    let surviving: Vec<&Observation> = observations
        .iter()
        .filter(|obs| obs.has_any_measurement() && oracle.is_valid(obs.timestamp))
        .collect();

    if surviving.is_empty() {
        FilterOutcome::OutOfWindow
    } else {
        FilterOutcome::Window(surviving)
    }
}
