//! Per-feature normalization statistics.
//!
//! Statistics are paired 1:1 with the feature order they were computed
//! under. The names are stored alongside the numbers so a consumer can refuse
//! an artifact produced by a different registry instead of silently
//! normalizing the wrong columns.

use serde::{Deserialize, Serialize};

use crate::config::StatsMethod;
use crate::error::{PipelineError, Result};
use crate::sequence::{FeatureVector, Sequence};

/// Location/scale per feature plus the retained-feature subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub method: StatsMethod,
    /// Median (robust) or mean (standard) per feature.
    pub location: Vec<f64>,
    /// `1.4826 * MAD` (robust) or std dev (standard); never 0.
    pub scale: Vec<f64>,
    /// Ascending feature indices kept by selection (all indices when unused).
    pub retained_indices: Vec<usize>,
    /// Registry feature names, in order.
    #[serde(default)]
    pub feature_names: Vec<String>,
}

impl NormalizationStats {
    /// Number of features the statistics cover.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.location.len()
    }

    /// Number of features left after selection.
    #[inline]
    pub fn n_retained(&self) -> usize {
        self.retained_indices.len()
    }

    /// Encode as pretty JSON. Floats round-trip exactly.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON and check internal consistency.
    pub fn from_json(json: &str) -> Result<Self> {
        let stats: NormalizationStats = serde_json::from_str(json)?;
        stats.check_shape()?;
        Ok(stats)
    }

    /// Refuse statistics computed under a different feature registry.
    pub fn validate_against(&self, names: &[&str]) -> Result<()> {
        if self.n_features() != names.len() {
            return Err(PipelineError::FeatureCountMismatch {
                expected: self.n_features(),
                actual: names.len(),
            });
        }
        if self.feature_names.len() < names.len() {
            let index = self.feature_names.len();
            return Err(PipelineError::FeatureOrderMismatch {
                index,
                expected: names[index].to_string(),
                found: String::new(),
            });
        }
        for (index, (stored, current)) in self.feature_names.iter().zip(names).enumerate() {
            if stored != current {
                return Err(PipelineError::FeatureOrderMismatch {
                    index,
                    expected: (*current).to_string(),
                    found: stored.clone(),
                });
            }
        }
        Ok(())
    }

    /// Normalize one feature vector and keep the retained features.
    pub fn normalize_vector(&self, vector: &[f64]) -> FeatureVector {
        self.retained_indices
            .iter()
            .map(|&i| (vector[i] - self.location[i]) / self.scale[i])
            .collect()
    }

    /// Normalize every timestep of a sequence.
    pub fn normalize_sequence(&self, sequence: &Sequence) -> Sequence {
        Sequence::new(
            sequence.end_index,
            sequence
                .steps
                .iter()
                .map(|step| self.normalize_vector(step))
                .collect(),
        )
    }

    fn check_shape(&self) -> Result<()> {
        let n = self.location.len();
        if self.scale.len() != n {
            return Err(PipelineError::FeatureCountMismatch {
                expected: n,
                actual: self.scale.len(),
            });
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != n {
            return Err(PipelineError::FeatureCountMismatch {
                expected: n,
                actual: self.feature_names.len(),
            });
        }
        if let Some(&bad) = self.retained_indices.iter().find(|&&i| i >= n) {
            return Err(PipelineError::InvalidConfig(format!(
                "retained index {bad} out of range for {n} features"
            )));
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(PipelineError::InvalidConfig(
                "scale entries must be finite and non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
