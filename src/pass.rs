//! The pass orchestrator.
//!
//! One repaint pass runs every in-scope point through the pipeline
//! (filter, deltas, classification, layout) and returns a per-point report
//! for the external renderer. The engine is the composition root: it owns
//! the store, the configuration, the admission controller and the position
//! cache, and resets the mutable services at the start of every pass.
//! Passes are synchronous and must run to completion before the next one
//! is triggered.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};

use crate::budget::{AdmissionController, RenderCategory};
use crate::cache::{PositionCache, ScenePosition};
use crate::config::PipelineConfig;
use crate::data::GeoPosition;
use crate::pipeline::{
    classify_observation, compute_deltas, filter_observations, project_time_stack, FilterOutcome,
    LayoutFrame, LayoutParams, LayoutSample, PointClassification, ValidityOracle,
};
use crate::store::{BaselineStore, PointSeries};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// One marker per monitoring point: the anchor, the magnified displacement
/// position, and the classification coloring it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointMarker {
    pub anchor: ScenePosition,
    /// Anchor offset by the latest zero-baseline delta, exaggerated by the
    /// configured magnification.
    pub displaced: ScenePosition,
    pub classification: PointClassification,
}

/// Everything emitted for one point that survived filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPoint {
    /// Absent when the point-marker budget was exhausted.
    pub marker: Option<PointMarker>,
    pub frames: Vec<LayoutFrame>,
}

/// Outcome of processing one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointStatus {
    /// The point has no observations at all.
    NoData,
    /// Observations exist but none fall inside the validity window.
    OutOfWindow,
    Rendered(RenderedPoint),
    /// Processing failed; the rest of the batch was unaffected.
    Failed { reason: String },
}

/// Per-point result of one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointResult {
    pub name: String,
    pub status: PointStatus,
}

/// The full report of one pass, in point-name order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    pub points: Vec<PointResult>,
}

impl PassReport {
    /// Total time-stack frames emitted across all points.
    pub fn frames_emitted(&self) -> usize {
        self.points
            .iter()
            .map(|p| match &p.status {
                PointStatus::Rendered(rendered) => rendered.frames.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Composition root for the derivation pipeline.
pub struct PassEngine {
    store: BaselineStore,
    config: PipelineConfig,
    budget: AdmissionController,
    cache: PositionCache,
    /// Scene origin: the first point's anchor, so coordinates stay small.
    origin: GeoPosition,
}

impl PassEngine {
    /// Build an engine over a loaded store.
    pub fn new(store: BaselineStore, config: PipelineConfig) -> Self {
        let origin = store
            .iter()
            .next()
            .map(|series| series.point.position)
            .unwrap_or(GeoPosition { lat: 0.0, lon: 0.0, height: 0.0 });
        let budget = AdmissionController::new(config.budgets.limit_table());
        Self { store, config, budget, cache: PositionCache::new(), origin }
    }

    pub fn store(&self) -> &BaselineStore {
        &self.store
    }

    /// Let a point bypass the admission caps on subsequent passes (the
    /// user explicitly focused it).
    pub fn add_to_allow_list(&mut self, name: impl Into<String>) {
        self.budget.add_to_allow_list(name);
    }

    pub fn clear_allow_list(&mut self) {
        self.budget.clear_allow_list();
    }

    /// Whether a category's budget is exhausted for an entity, for callers
    /// that want to short-circuit before building expensive geometry.
    pub fn is_limit_reached(&self, category: RenderCategory, entity_id: &str) -> bool {
        self.budget.is_limit_reached(category, entity_id)
    }

    /// Run one pass against the current wall clock.
    pub fn run_pass(&mut self, oracle: &dyn ValidityOracle) -> PassReport {
        self.run_pass_at(oracle, Utc::now())
    }

    /// Run one pass with an explicit `now` (deterministic callers, tests).
    pub fn run_pass_at(&mut self, oracle: &dyn ValidityOracle, now: DateTime<Utc>) -> PassReport {
        // Fresh counters and cache before the first admission query; stale
        // state must never leak between passes.
        self.budget.reset();
        self.cache.clear();

        let Self { store, config, budget, cache, origin } = self;
        let params = config.layout.params();

        let mut points = Vec::with_capacity(store.len());
        for series in store.iter() {
            let name = series.point.name.clone();
            let status = catch_unwind(AssertUnwindSafe(|| {
                process_point(series, &params, config, budget, cache, *origin, oracle, now)
            }))
            .unwrap_or_else(|_| {
                // One bad point must not take the batch down with it.
                error!(point = %name, "point processing panicked, skipping");
                PointStatus::Failed { reason: "point processing panicked".to_string() }
            });
            points.push(PointResult { name, status });
        }

        let report = PassReport { points };
        debug!(
            points = report.points.len(),
            frames = report.frames_emitted(),
            "pass complete"
        );
        report
    }
}

#[allow(clippy::too_many_arguments)]
fn process_point(
    series: &PointSeries,
    params: &LayoutParams,
    config: &PipelineConfig,
    budget: &AdmissionController,
    cache: &mut PositionCache,
    origin: GeoPosition,
    oracle: &dyn ValidityOracle,
    now: DateTime<Utc>,
) -> PointStatus {
    let point = &series.point;

    let filtered = match filter_observations(&series.observations, oracle) {
        FilterOutcome::NoData => return PointStatus::NoData,
        FilterOutcome::OutOfWindow => return PointStatus::OutOfWindow,
        FilterOutcome::Window(filtered) => filtered,
    };

    let deltas = compute_deltas(
        &filtered,
        point.zero_baseline.as_ref(),
        point.rolling_baseline.as_ref(),
    );

    let samples: Vec<LayoutSample> = filtered
        .iter()
        .zip(&deltas)
        .map(|(obs, delta)| LayoutSample {
            timestamp: obs.timestamp,
            magnitude: delta.vs_zero.max_magnitude(),
            classification: classify_observation(&delta.vs_zero, point.profile.as_ref(), point.kind),
        })
        .collect();

    let frames = project_time_stack(&samples, now, params, budget, &point.name);

    let marker = if budget.is_limit_reached(RenderCategory::PointMarker, &point.name) {
        None
    } else {
        budget.increment(RenderCategory::PointMarker);
        let anchor = cache.get_or_compute(&point.name, || project_anchor(origin, point.position));

        // Latest in-window observation drives the marker: its magnified
        // displacement and its classification.
        let latest_delta = deltas.last().copied().unwrap_or_default();
        let displacement = latest_delta.vs_zero.magnified(config.magnification);
        let (east, north) = displacement
            .plane
            .map_or((0.0, 0.0), |plane| (plane.dx, plane.dy));
        let up = displacement.height.unwrap_or(0.0);

        Some(PointMarker {
            anchor,
            displaced: anchor.offset(east, north, up),
            classification: samples
                .last()
                .map(|sample| sample.classification)
                .unwrap_or(PointClassification {
                    height: crate::pipeline::Classification::UNDEFINED,
                    plane: crate::pipeline::Classification::UNDEFINED,
                }),
        })
    };

    PointStatus::Rendered(RenderedPoint { marker, frames })
}

/// Project a geodetic anchor into the local scene frame.
///
/// Equirectangular approximation around the scene origin; monitoring
/// networks span at most a few kilometers, where the error is negligible.
fn project_anchor(origin: GeoPosition, position: GeoPosition) -> ScenePosition {
    let north = (position.lat - origin.lat).to_radians() * EARTH_RADIUS_M;
    let east =
        (position.lon - origin.lon).to_radians() * EARTH_RADIUS_M * origin.lat.to_radians().cos();
    ScenePosition { east, north, up: position.height - origin.height }
}
