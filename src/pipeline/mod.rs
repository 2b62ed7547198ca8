//! The per-point derivation pipeline.
//!
//! Each pass runs every in-scope point through the stages below, strictly
//! in order; all outputs are recomputed per pass and never persisted.
//!
//! ```text
//! raw observations
//!        │
//!        ▼
//! filter (validity window)
//!        │
//!        ▼
//! delta (vs zero / rolling / previous)
//!        │
//!        ▼
//! classify (ordinal alarm levels)
//!        │
//!        ▼
//! layout (collision-free time stack, budget-capped)
//! ```

pub mod classify;
pub mod delta;
pub mod filter;
pub mod layout;

pub use classify::{classify_component, classify_observation, Classification, PointClassification};
pub use delta::{compute_deltas, DeltaResult, DeltaSet, PlaneDelta};
pub use filter::{filter_observations, DateWindow, FilterOutcome, ValidityOracle};
pub use layout::{project_time_stack, LayoutFrame, LayoutParams, LayoutSample};
