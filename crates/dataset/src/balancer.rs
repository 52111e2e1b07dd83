//! Class balancing.
//!
//! Balancing never mutates its input; every policy returns a new
//! [`Dataset`]. When a class is empty there is nothing to balance against
//! and the dataset is returned unchanged.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};
use types::{BalancingStrategy, ClassCounts, Dataset, Label, PipelineConfig, Sample};

use crate::neighbors::NeighborIndex;

/// Undersampling is abandoned for SMOTE under [`BalancingStrategy::Auto`]
/// when it would discard more than this fraction of the majority class.
pub const AUTO_DISCARD_LIMIT: f64 = 0.5;

/// Applies one [`BalancingStrategy`] with a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetBalancer {
    strategy: BalancingStrategy,
    undersample_ratio: f64,
    smote_neighbors: usize,
    seed: u64,
    force_sequential: bool,
}

impl Default for DatasetBalancer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl DatasetBalancer {
    pub fn new(strategy: BalancingStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            strategy: config.balancing,
            undersample_ratio: config.undersample_ratio,
            smote_neighbors: config.smote_neighbors,
            seed: config.seed,
            force_sequential: config.force_sequential,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_undersample_ratio(mut self, ratio: f64) -> Self {
        self.undersample_ratio = ratio;
        self
    }

    pub fn with_smote_neighbors(mut self, k: usize) -> Self {
        self.smote_neighbors = k;
        self
    }

    #[inline]
    pub fn strategy(&self) -> BalancingStrategy {
        self.strategy
    }

    /// Balance according to the configured strategy.
    pub fn balance(&self, dataset: &Dataset) -> Dataset {
        match self.resolve(dataset.class_counts()) {
            BalancingStrategy::None => dataset.clone(),
            BalancingStrategy::Undersample => {
                undersample(dataset, self.undersample_ratio, self.seed)
            }
            BalancingStrategy::Smote | BalancingStrategy::Auto => smote(
                dataset,
                self.smote_neighbors,
                self.seed,
                self.force_sequential,
            ),
        }
    }

    /// Concrete strategy for the given counts (`Auto` resolved).
    pub fn resolve(&self, counts: ClassCounts) -> BalancingStrategy {
        match self.strategy {
            BalancingStrategy::Auto => {
                let discarded = undersample_discard_fraction(counts, self.undersample_ratio);
                let chosen = if discarded > AUTO_DISCARD_LIMIT {
                    BalancingStrategy::Smote
                } else {
                    BalancingStrategy::Undersample
                };
                debug!(?chosen, discarded, "auto balancing resolved");
                chosen
            }
            other => other,
        }
    }
}

/// Per-class size undersampling keeps: `min(minority, floor(majority · ratio))`.
pub fn undersample_target(counts: ClassCounts, ratio: f64) -> usize {
    let minority = counts.sell.min(counts.buy);
    let majority = counts.sell.max(counts.buy);
    minority.min((majority as f64 * ratio).floor() as usize)
}

/// Fraction of the majority class undersampling would drop.
pub fn undersample_discard_fraction(counts: ClassCounts, ratio: f64) -> f64 {
    let majority = counts.sell.max(counts.buy);
    if majority == 0 {
        return 0.0;
    }
    let kept = undersample_target(counts, ratio);
    (majority - kept) as f64 / majority as f64
}

// =============================================================================
// Undersampling
// =============================================================================

/// Keep the first `target` samples of each class (original order), then
/// shuffle the concatenation with a seeded RNG.
pub fn undersample(dataset: &Dataset, ratio: f64, seed: u64) -> Dataset {
    let counts = dataset.class_counts();
    if counts.has_empty_class() {
        warn!(
            sell = counts.sell,
            buy = counts.buy,
            "one class is empty; skipping undersampling"
        );
        return dataset.clone();
    }

    let target = undersample_target(counts, ratio);
    let mut samples: Vec<Sample> = Label::ALL
        .iter()
        .flat_map(|&label| {
            dataset
                .iter()
                .filter(move |s| s.label == label)
                .take(target)
                .cloned()
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);
    Dataset::new(samples)
}

// =============================================================================
// SMOTE
// =============================================================================

/// Synthesize minority samples until both classes are the same size.
///
/// Minority sequences are indexed once. Synthetic sample `j` interpolates
/// minority sample `j mod m` towards one of its `k` nearest minority
/// neighbours, chosen at random, by a random `λ ∈ (0, 1)`. The input samples
/// come first, followed by the synthetic ones.
pub fn smote(dataset: &Dataset, k: usize, seed: u64, force_sequential: bool) -> Dataset {
    let counts = dataset.class_counts();
    if counts.has_empty_class() {
        warn!(
            sell = counts.sell,
            buy = counts.buy,
            "one class is empty; skipping SMOTE"
        );
        return dataset.clone();
    }

    let minority_label = counts.minority();
    let minority: Vec<&Sample> = dataset
        .iter()
        .filter(|s| s.label == minority_label)
        .collect();
    let needed = counts.get(minority_label.opposite()) - minority.len();
    if needed == 0 {
        return dataset.clone();
    }
    if minority.len() < 2 {
        warn!(
            minority = minority.len(),
            "too few minority samples to interpolate; skipping SMOTE"
        );
        return dataset.clone();
    }

    let k = k.clamp(1, minority.len() - 1);
    let index = NeighborIndex::from_sequences(minority.iter().map(|s| &s.sequence));
    let neighbors = index.all_nearest(k, force_sequential);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(dataset.len() + needed);
    samples.extend(dataset.iter().cloned());
    for j in 0..needed {
        let base = j % minority.len();
        let candidates = &neighbors[base];
        let partner = candidates[rng.random_range(0..candidates.len())];
        let lambda = loop {
            let draw: f64 = rng.random();
            if draw > 0.0 {
                break draw;
            }
        };
        let sequence = minority[base]
            .sequence
            .interpolate(&minority[partner].sequence, lambda);
        samples.push(Sample::new(sequence, minority_label).into_synthetic());
    }

    debug!(
        synthetic = needed,
        minority = ?minority_label,
        k,
        "SMOTE generated samples"
    );
    Dataset::new(samples)
}
