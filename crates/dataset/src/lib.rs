//! Dataset assembly for the sequence pipeline.
//!
//! Turns feature sequences into a labeled, balanced and filtered
//! [`types::Dataset`] plus the [`types::NormalizationStats`] a model needs
//! at inference time.
//!
//! - [`labeler`] - Forward-return buy/sell labels
//! - [`balancer`] - Undersampling and SMOTE ([`DatasetBalancer`])
//! - [`neighbors`] - Exact k-NN index used by SMOTE
//! - [`curriculum`] - Difficulty scoring and easiest-fraction filtering
//! - [`normalization`] - Robust/standard statistics ([`FeatureStatsComputer`])
//! - [`selection`] - Constant and correlated feature pruning
//! - [`pipeline`] - Everything above wired together ([`DatasetPipeline`])
//!
//! # Example
//!
//! ```
//! use dataset::DatasetPipeline;
//! use features::FeatureRegistry;
//! use types::{MarketSeries, PipelineConfig};
//!
//! let prices: Vec<f64> = (0..320).map(|i| 100.0 + (i as f64 * 0.2).sin() * 3.0).collect();
//! let series = MarketSeries::new(prices, vec![1_000.0; 320]).unwrap();
//!
//! let config = PipelineConfig::default().with_timesteps(20);
//! let pipeline = DatasetPipeline::new(FeatureRegistry::standard(), config).unwrap();
//! let output = pipeline.run(&series);
//!
//! assert!(output.dataset.iter().all(|s| s.sequence.timesteps() == 20));
//! assert_eq!(output.stats.n_features(), pipeline.registry().feature_count());
//! ```

pub mod balancer;
pub mod curriculum;
pub mod labeler;
pub mod neighbors;
pub mod normalization;
pub mod pipeline;
pub mod selection;

pub use balancer::{DatasetBalancer, smote, undersample};
pub use curriculum::{MIN_CURRICULUM_SAMPLES, difficulty};
pub use labeler::{forward_return, label, label_all};
pub use neighbors::NeighborIndex;
pub use normalization::FeatureStatsComputer;
pub use pipeline::{DatasetPipeline, PipelineOutput, PipelineSummary};
pub use selection::select_features;
