//! Error types for pipeline construction and artifact handling.
//!
//! Only configuration-level problems are errors. Short history, invalid
//! features and empty classes are handled locally by the stage that meets
//! them and never surface here.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort pipeline construction or artifact loading.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Prices and volumes (or highs/lows) have different lengths.
    #[error("series length mismatch: {prices} prices vs {other} {what}")]
    LengthMismatch {
        prices: usize,
        other: usize,
        what: &'static str,
    },

    /// The market series holds no observations.
    #[error("market series is empty")]
    EmptySeries,

    /// A configured or persisted feature count disagrees with the registry.
    #[error("feature count mismatch: expected {expected}, registry has {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// Persisted feature names are in a different order than the registry.
    #[error("feature order mismatch at index {index}: expected '{expected}', found '{found}'")]
    FeatureOrderMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Encoding or decoding of a JSON artifact failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
