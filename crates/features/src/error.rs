//! Feature assembly errors.

use thiserror::Error;

/// Why a feature vector could not be produced for a day.
///
/// These are recoverable: the sequence builder drops the affected sequence
/// and carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// The requested day lies past the end of the series.
    #[error("day index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A feature evaluated to NaN or infinity.
    #[error("feature '{feature}' is non-finite ({value}) at day {day_index}")]
    NonFinite {
        day_index: usize,
        feature: &'static str,
        value: f64,
    },

    /// Two descriptors share a name.
    #[error("duplicate feature name '{0}'")]
    DuplicateName(&'static str),
}
