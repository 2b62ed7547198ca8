//! # geowatch
//!
//! Alarm classification and time-stack layout core for geotechnical and
//! groundwater monitoring visualizations.
//!
//! A desktop map application shows one marker per monitoring point plus a
//! "time stack" of its observation history. This crate is the numeric core
//! behind that picture: it turns a raw, irregularly sampled observation
//! series per point into baseline-relative deltas, an ordinal alarm
//! classification, and a deterministic, collision-free 1-D layout of sized
//! primitives, under a hard per-category budget on how many primitives one
//! repaint pass may emit. Rendering itself, GUI widgets and data ingestion
//! pipelines are external collaborators.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        PassEngine                            │
//! │                                                              │
//! │  ┌───────┐   ┌────────┐   ┌──────────┐   ┌────────┐          │
//! │  │ store │──▶│ filter │──▶│ delta    │──▶│classify│─┐        │
//! │  └───────┘   └────────┘   └──────────┘   └────────┘ │        │
//! │                                                      ▼        │
//! │  ┌────────┐   ┌───────┐                        ┌────────┐    │
//! │  │ budget │◀──│ cache │◀───────────────────────│ layout │    │
//! │  └────────┘   └───────┘                        └────────┘    │
//! │                                                      │        │
//! └──────────────────────────────────────────────────────┼────────┘
//!                                                        ▼
//!                                        LayoutFrames / PointMarkers
//! ```
//!
//! - **[`data`]**: the read-only model: points, baselines, observations,
//!   alarm threshold profiles
//! - **[`pipeline`]**: the per-pass derivation stages: temporal filter,
//!   delta calculator, alarm classifier, time-stack layout projector
//! - **[`budget`]**: the render-budget admission controller, the only
//!   backpressure mechanism
//! - **[`cache`]**: the per-pass derived-position cache
//! - **[`store`]**: ownership of loaded points and their series
//! - **[`dataset`]**: the serialized dataset schema and file loading
//! - **[`pass`]**: the orchestrator composing all of the above
//! - **[`config`]**: layout constants and budget limits
//!
//! ## Usage
//!
//! ```
//! use geowatch::{Dataset, DateWindow, PassEngine, PipelineConfig};
//!
//! let dataset = Dataset::parse(r#"{
//!     "points": [{
//!         "name": "P-101",
//!         "position": { "lat": 47.37, "lon": 8.54, "height": 408.0 },
//!         "kind": "height",
//!         "zero_baseline": { "z": 408.125, "date": "2023-04-01T08:00:00Z" },
//!         "observations": [
//!             { "timestamp": "2023-04-01T08:00:00Z", "height": 408.125 },
//!             { "timestamp": "2023-07-12T09:30:00Z", "height": 408.118 }
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! let store = dataset.into_store().unwrap();
//! let mut engine = PassEngine::new(store, PipelineConfig::default());
//! let report = engine.run_pass(&DateWindow::default());
//! assert_eq!(report.points.len(), 1);
//! ```

pub mod budget;
pub mod cache;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod pass;
pub mod pipeline;
pub mod store;

// Re-export main types for convenience
pub use budget::{AdmissionController, RenderCategory};
pub use cache::{PositionCache, ScenePosition};
pub use config::{BudgetConfig, LayoutConfig, PipelineConfig};
pub use data::{
    AlarmLevel, AlarmProfile, Baseline, ComponentProfile, GeoPosition, MonitoringPoint,
    Observation, PointKind, ThresholdBand,
};
pub use dataset::Dataset;
pub use error::{DatasetError, ProfileError};
pub use pass::{PassEngine, PassReport, PointMarker, PointResult, PointStatus, RenderedPoint};
pub use pipeline::{
    classify_component, classify_observation, compute_deltas, filter_observations,
    project_time_stack, Classification, DateWindow, DeltaResult, DeltaSet, FilterOutcome,
    LayoutFrame, LayoutParams, LayoutSample, PlaneDelta, PointClassification, ValidityOracle,
};
pub use store::{BaselineStore, PointSeries};
