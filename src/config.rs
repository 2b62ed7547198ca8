//! Pipeline configuration: layout constants and render budgets.
//!
//! Everything here has a sensible default; a config file (TOML/JSON via the
//! `config` crate) and `GEOWATCH__`-prefixed environment variables override
//! individual fields.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Duration;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::budget::RenderCategory;
use crate::pipeline::LayoutParams;

/// Layout constants for the time-stack projector.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Elapsed minutes represented by one unit of stack length.
    pub minutes_per_unit: f64,
    /// Scale from delta magnitude (meters) to frame size.
    pub size_scale: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub min_thickness: f64,
    /// Days after which the most recent frame is dimmed as stale.
    pub stale_after_days: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            minutes_per_unit: 24_000.0,
            size_scale: 20.0,
            min_size: 0.15,
            max_size: 1.5,
            min_thickness: 0.0005,
            stale_after_days: 180,
        }
    }
}

impl LayoutConfig {
    /// The projector parameter set for this configuration.
    pub fn params(&self) -> LayoutParams {
        LayoutParams {
            minutes_per_unit: self.minutes_per_unit,
            size_scale: self.size_scale,
            min_size: self.min_size,
            max_size: self.max_size,
            min_thickness: self.min_thickness,
            stale_after: Duration::days(self.stale_after_days),
        }
    }
}

/// Per-category emission limits for one pass.
///
/// The limit table is configuration on purpose: which categories exist is a
/// property of the code, what their budget is belongs to the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub time_stack: usize,
    pub point_marker: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self { time_stack: 5_000, point_marker: 2_000 }
    }
}

impl BudgetConfig {
    /// The limit table consumed by the admission controller.
    pub fn limit_table(&self) -> [(RenderCategory, usize); 2] {
        [
            (RenderCategory::TimeStack, self.time_stack),
            (RenderCategory::PointMarker, self.point_marker),
        ]
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub layout: LayoutConfig,
    pub budgets: BudgetConfig,
    /// Visualization exaggeration applied where a delta feeds spatial
    /// layout (marker displacement). Never applied to classification.
    pub magnification: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            budgets: BudgetConfig::default(),
            // 1000x turns centimeter movements into meter-scale offsets.
            magnification: 1_000.0,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a file, with `GEOWATCH__` environment
    /// variables taking precedence (e.g. `GEOWATCH__BUDGETS__TIME_STACK`).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("GEOWATCH").separator("__").try_parsing(true))
            .build()
            .context("failed to load pipeline configuration")?;
        config.try_deserialize().context("invalid pipeline configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.layout.minutes_per_unit, 24_000.0);
        assert_eq!(config.layout.stale_after_days, 180);
        assert_eq!(config.budgets.time_stack, 5_000);
        assert_eq!(config.budgets.point_marker, 2_000);
        assert_eq!(config.magnification, 1_000.0);
    }

    #[test]
    fn file_overrides_individual_fields() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "magnification = 250.0\n\n[budgets]\ntime_stack = 42").unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.magnification, 250.0);
        assert_eq!(config.budgets.time_stack, 42);
        // Untouched fields keep their defaults.
        assert_eq!(config.budgets.point_marker, 2_000);
        assert_eq!(config.layout.minutes_per_unit, 24_000.0);
    }

    #[test]
    fn limit_table_carries_every_category() {
        let table = BudgetConfig::default().limit_table();
        assert_eq!(table.len(), 2);
        assert!(table.iter().any(|(c, _)| *c == RenderCategory::TimeStack));
        assert!(table.iter().any(|(c, _)| *c == RenderCategory::PointMarker));
    }

    #[test]
    fn layout_params_mirror_the_config() {
        let params = LayoutConfig::default().params();
        assert_eq!(params.minutes_per_unit, 24_000.0);
        assert_eq!(params.stale_after, Duration::days(180));
    }
}
