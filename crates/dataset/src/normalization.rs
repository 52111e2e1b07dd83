//! Per-feature normalization statistics.

use quant::stats::{mean, median, median_absolute_deviation, std_dev};
use tracing::debug;
use types::{
    FeatureSelection, MAD_TO_STD, NormalizationStats, PipelineConfig, Sequence, StatsMethod,
};

use crate::selection::select_features;

/// Computes [`NormalizationStats`] over every timestep of a set of sequences.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureStatsComputer {
    method: StatsMethod,
    selection: FeatureSelection,
    force_sequential: bool,
}

impl FeatureStatsComputer {
    pub fn new(method: StatsMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            method: config.stats_method,
            selection: config.selection,
            force_sequential: config.force_sequential,
        }
    }

    pub fn with_selection(mut self, selection: FeatureSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_force_sequential(mut self, force_sequential: bool) -> Self {
        self.force_sequential = force_sequential;
        self
    }

    /// Location and scale per feature, stamped with `feature_names`.
    ///
    /// A zero spread becomes a scale of 1.0. With no sequences every
    /// location is 0 and every scale 1.
    pub fn compute<'a>(
        &self,
        sequences: impl IntoIterator<Item = &'a Sequence>,
        feature_names: &[&str],
    ) -> NormalizationStats {
        let columns = collect_columns(sequences, feature_names.len());
        let estimates = parallel::map_slice(
            &columns,
            |column| estimate(column, self.method),
            self.force_sequential,
        );
        let (location, scale): (Vec<f64>, Vec<f64>) = estimates.into_iter().unzip();
        let retained_indices = select_features(&columns, self.selection);

        debug!(
            method = ?self.method,
            features = location.len(),
            retained = retained_indices.len(),
            observations = columns.first().map_or(0, Vec::len),
            "computed normalization statistics"
        );

        NormalizationStats {
            method: self.method,
            location,
            scale,
            retained_indices,
            feature_names: feature_names.iter().map(|n| (*n).to_string()).collect(),
        }
    }
}

/// Transpose sequences into one column per feature.
fn collect_columns<'a>(
    sequences: impl IntoIterator<Item = &'a Sequence>,
    n_features: usize,
) -> Vec<Vec<f64>> {
    let mut columns = vec![Vec::new(); n_features];
    for step in sequences.into_iter().flat_map(|s| s.steps.iter()) {
        for (column, &value) in columns.iter_mut().zip(step) {
            column.push(value);
        }
    }
    columns
}

fn estimate(column: &[f64], method: StatsMethod) -> (f64, f64) {
    let (location, spread) = match method {
        StatsMethod::Robust => (
            median(column),
            median_absolute_deviation(column).map(|mad| MAD_TO_STD * mad),
        ),
        StatsMethod::Standard => (mean(column), std_dev(column)),
    };
    let scale = match spread {
        Some(s) if s > 0.0 && s.is_finite() => s,
        _ => 1.0,
    };
    (location.unwrap_or(0.0), scale)
}
