//! Error types for dataset ingest and profile validation.

use thiserror::Error;

/// Errors raised when validating an alarm threshold profile.
///
/// Profiles are validated once, at construction; the classifier itself
/// never errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A band's upper bound is not above its lower bound.
    #[error("band {index} is empty or inverted: [{min}, {max}]")]
    EmptyBand { index: usize, min: f64, max: f64 },

    /// Adjacent bands leave a gap or overlap.
    #[error("band {index} does not begin where the previous band ends ({expected} != {found})")]
    NotContiguous { index: usize, expected: f64, found: f64 },

    /// A bound is NaN or infinite.
    #[error("band {index} has a non-finite bound")]
    NonFinite { index: usize },
}

/// Errors raised when loading a dataset into the baseline store.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to read the dataset file.
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset is not valid JSON for the expected schema.
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two points share a name; identities must be unique.
    #[error("duplicate point name: {name}")]
    DuplicatePoint { name: String },

    /// A point's observations are not in ascending timestamp order.
    #[error("observations for point {name} are not in ascending timestamp order (index {index})")]
    UnsortedObservations { name: String, index: usize },

    /// A point's alarm profile failed validation.
    #[error("invalid alarm profile for point {name}: {source}")]
    InvalidProfile {
        name: String,
        #[source]
        source: ProfileError,
    },
}
