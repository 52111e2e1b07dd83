//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is built once (from defaults, a JSON file, or CLI
//! overrides), validated, and then passed by reference to every stage. There
//! is no ambient or static configuration state.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

// =============================================================================
// Labeling
// =============================================================================

/// Forward-return labeling rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Minimum forward return (fraction) for a `Buy` label, exclusive.
    pub threshold: f64,
    /// Number of days ahead the forward return is measured over.
    pub horizon: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            threshold: 0.001,
            horizon: 7,
        }
    }
}

// =============================================================================
// Balancing
// =============================================================================

/// Class-balancing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancingStrategy {
    /// Keep the dataset as built.
    None,
    /// Trim both classes to a common size and shuffle.
    #[default]
    Undersample,
    /// Synthesize minority sequences by neighbour interpolation.
    Smote,
    /// SMOTE when undersampling would discard more than half the majority.
    Auto,
}

impl std::str::FromStr for BalancingStrategy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "undersample" => Ok(Self::Undersample),
            "smote" => Ok(Self::Smote),
            "auto" => Ok(Self::Auto),
            other => Err(PipelineError::InvalidConfig(format!(
                "unknown balancing strategy '{other}' (expected none|undersample|smote|auto)"
            ))),
        }
    }
}

// =============================================================================
// Normalization statistics
// =============================================================================

/// Location/scale estimator for normalization statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsMethod {
    /// Median and `1.4826 * MAD`.
    #[default]
    Robust,
    /// Mean and population standard deviation.
    Standard,
}

/// Optional feature selection applied when computing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FeatureSelection {
    /// Keep every feature (identity subset).
    #[default]
    All,
    /// Drop constant features and greedily drop features highly correlated
    /// with an already retained one.
    Decorrelated {
        max_features: usize,
        max_abs_correlation: f64,
    },
}

// =============================================================================
// PipelineConfig
// =============================================================================

/// Master configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Sequence shape
    // ─────────────────────────────────────────────────────────────────────────
    /// Timesteps per sequence (`T`).
    pub timesteps: usize,
    /// Expected feature count (`F`). `None` until resolved from the registry.
    pub feature_count: Option<usize>,
    /// First sequence end index. `None` means the registry lookback.
    pub start_index: Option<usize>,
    /// Distance between consecutive sequence end indices.
    pub stride: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Labels & balancing
    // ─────────────────────────────────────────────────────────────────────────
    pub label: LabelConfig,
    pub balancing: BalancingStrategy,
    /// Fraction of the majority class undersampling may keep at most.
    pub undersample_ratio: f64,
    /// Neighbours considered per minority sample by SMOTE.
    pub smote_neighbors: usize,
    /// Seed for every random choice (shuffles, SMOTE draws).
    pub seed: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Curriculum & statistics
    // ─────────────────────────────────────────────────────────────────────────
    /// Fraction of easiest samples to keep, in `[0.1, 1.0]`.
    pub curriculum_level: f64,
    pub stats_method: StatsMethod,
    pub selection: FeatureSelection,

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────
    /// Run every stage sequentially even when the `parallel` feature is on.
    pub force_sequential: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timesteps: 60,
            feature_count: None,
            start_index: None,
            stride: 1,

            label: LabelConfig::default(),
            balancing: BalancingStrategy::default(),
            undersample_ratio: 0.8,
            smote_neighbors: 5,
            seed: 42,

            curriculum_level: 1.0,
            stats_method: StatsMethod::default(),
            selection: FeatureSelection::default(),

            force_sequential: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_timesteps(mut self, timesteps: usize) -> Self {
        self.timesteps = timesteps;
        self
    }

    pub fn with_feature_count(mut self, feature_count: usize) -> Self {
        self.feature_count = Some(feature_count);
        self
    }

    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = Some(start_index);
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_label(mut self, threshold: f64, horizon: usize) -> Self {
        self.label = LabelConfig { threshold, horizon };
        self
    }

    pub fn with_balancing(mut self, balancing: BalancingStrategy) -> Self {
        self.balancing = balancing;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_curriculum_level(mut self, level: f64) -> Self {
        self.curriculum_level = level;
        self
    }

    pub fn with_stats_method(mut self, method: StatsMethod) -> Self {
        self.stats_method = method;
        self
    }

    pub fn with_selection(mut self, selection: FeatureSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_force_sequential(mut self, force_sequential: bool) -> Self {
        self.force_sequential = force_sequential;
        self
    }

    /// Check every option against its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.timesteps == 0 {
            return Err(invalid("timesteps must be > 0"));
        }
        if self.stride == 0 {
            return Err(invalid("stride must be > 0"));
        }
        if self.label.horizon == 0 {
            return Err(invalid("label horizon must be > 0"));
        }
        if !self.label.threshold.is_finite() {
            return Err(invalid("label threshold must be finite"));
        }
        if !(0.1..=1.0).contains(&self.curriculum_level) {
            return Err(invalid(format!(
                "curriculum level {} outside [0.1, 1.0]",
                self.curriculum_level
            )));
        }
        if !(self.undersample_ratio > 0.0 && self.undersample_ratio <= 1.0) {
            return Err(invalid("undersample ratio must lie in (0, 1]"));
        }
        if self.smote_neighbors == 0 {
            return Err(invalid("smote neighbours must be > 0"));
        }
        if let FeatureSelection::Decorrelated {
            max_features,
            max_abs_correlation,
        } = self.selection
        {
            if max_features == 0 {
                return Err(invalid("selection max_features must be > 0"));
            }
            if !(0.0..=1.0).contains(&max_abs_correlation) {
                return Err(invalid("selection max_abs_correlation must lie in [0, 1]"));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> PipelineError {
    PipelineError::InvalidConfig(msg.into())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.label.threshold, 0.001);
        assert_eq!(config.label.horizon, 7);
        assert_eq!(config.curriculum_level, 1.0);
    }

    #[test]
    fn test_curriculum_level_range() {
        assert!(
            PipelineConfig::default()
                .with_curriculum_level(0.05)
                .validate()
                .is_err()
        );
        assert!(
            PipelineConfig::default()
                .with_curriculum_level(0.1)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"timesteps": 30, "balancing": "smote"}"#).unwrap();
        assert_eq!(config.timesteps, 30);
        assert_eq!(config.balancing, BalancingStrategy::Smote);
        assert_eq!(config.label, LabelConfig::default());
    }

    #[test]
    fn test_balancing_from_str() {
        assert_eq!(
            "Undersample".parse::<BalancingStrategy>().unwrap(),
            BalancingStrategy::Undersample
        );
        assert!("oversample".parse::<BalancingStrategy>().is_err());
    }

    #[test]
    fn test_selection_serde_tagged() {
        let selection: FeatureSelection = serde_json::from_str(
            r#"{"kind": "decorrelated", "max_features": 20, "max_abs_correlation": 0.95}"#,
        )
        .unwrap();
        assert_eq!(
            selection,
            FeatureSelection::Decorrelated {
                max_features: 20,
                max_abs_correlation: 0.95
            }
        );
    }
}
