//! End-to-end dataset construction.
//!
//! ```text
//! MarketSeries ─► SequenceBuilder ─► Labeler ─► DatasetBalancer ─► CurriculumFilter ─► Dataset
//!                        │
//!                        └──────────► FeatureStatsComputer ─► NormalizationStats
//! ```

use features::{FeatureRegistry, SequenceBuilder, detect_feature_count};
use serde::Serialize;
use tracing::info;
use types::{
    ClassCounts, Dataset, MarketSeries, NormalizationStats, PipelineConfig, PipelineError,
    Result, Sample,
};

use crate::balancer::DatasetBalancer;
use crate::curriculum;
use crate::labeler;
use crate::normalization::FeatureStatsComputer;

/// Counts reported for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    /// End indices considered.
    pub candidates: usize,
    /// Candidates dropped because a day in the window failed to assemble.
    pub rejected: usize,
    /// Sequences built and labeled.
    pub built: usize,
    /// Class counts before balancing.
    pub raw_counts: ClassCounts,
    pub balanced: usize,
    pub final_count: usize,
    pub feature_count: usize,
    pub timesteps: usize,
    /// Registry fingerprint the dataset and statistics were built under.
    pub fingerprint: u64,
}

/// Output of [`DatasetPipeline::run`].
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub dataset: Dataset,
    pub stats: NormalizationStats,
    pub summary: PipelineSummary,
}

/// A validated configuration bound to a feature registry.
#[derive(Debug, Clone)]
pub struct DatasetPipeline {
    registry: FeatureRegistry,
    config: PipelineConfig,
}

impl DatasetPipeline {
    /// Validate `config` and resolve its feature count against `registry`.
    ///
    /// A configured feature count that differs from the registry is fatal.
    pub fn new(registry: FeatureRegistry, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let detected = detect_feature_count(&registry);
        match config.feature_count {
            Some(configured) if configured != detected => {
                return Err(PipelineError::FeatureCountMismatch {
                    expected: configured,
                    actual: detected,
                });
            }
            _ => {}
        }
        let config = PipelineConfig {
            feature_count: Some(detected),
            ..config
        };
        Ok(Self { registry, config })
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// First sequence end index: the configured start or the registry lookback.
    pub fn first_index(&self) -> usize {
        self.config
            .start_index
            .unwrap_or_else(|| self.registry.lookback())
    }

    /// Build, label, balance and filter sequences from `series`.
    ///
    /// Statistics are computed over the labeled sequences before balancing,
    /// so synthetic samples never shift them. Days whose label horizon runs
    /// past the series end are not used.
    pub fn run(&self, series: &MarketSeries) -> PipelineOutput {
        let config = &self.config;
        let names = self.registry.names();
        let first = self.first_index();
        let end = series.len().saturating_sub(config.label.horizon);

        let candidates = if first < end {
            (end - first).div_ceil(config.stride)
        } else {
            0
        };
        info!(
            bars = series.len(),
            first,
            end,
            candidates,
            timesteps = config.timesteps,
            features = names.len(),
            "building sequences"
        );

        let sequences = SequenceBuilder::new(&self.registry, config.timesteps)
            .with_force_sequential(config.force_sequential)
            .build_batch(series, first, end, config.stride);
        let built = sequences.len();

        let raw: Dataset = sequences
            .into_iter()
            .map(|sequence| {
                let label = labeler::label(series.prices(), sequence.end_index, &config.label);
                Sample::new(sequence, label)
            })
            .collect();
        let raw_counts = raw.class_counts();
        info!(
            built,
            rejected = candidates - built,
            sell = raw_counts.sell,
            buy = raw_counts.buy,
            "labeled sequences"
        );

        let stats = FeatureStatsComputer::from_config(config).compute(raw.sequences(), &names);

        let balanced = DatasetBalancer::from_config(config).balance(&raw);
        let counts = balanced.class_counts();
        info!(
            strategy = ?config.balancing,
            sell = counts.sell,
            buy = counts.buy,
            "balanced dataset"
        );

        let dataset = curriculum::filter(&balanced, config.curriculum_level);
        info!(
            level = config.curriculum_level,
            samples = dataset.len(),
            "curriculum filter applied"
        );

        let summary = PipelineSummary {
            candidates,
            rejected: candidates - built,
            built,
            raw_counts,
            balanced: balanced.len(),
            final_count: dataset.len(),
            feature_count: names.len(),
            timesteps: config.timesteps,
            fingerprint: self.registry.fingerprint(),
        };

        PipelineOutput {
            dataset,
            stats,
            summary,
        }
    }
}
