//! Feature engineering for the sequence dataset pipeline.
//!
//! - [`registry`] - The ordered, named feature set ([`FeatureRegistry`])
//! - [`assembler`] - One [`types::FeatureVector`] per day ([`FeatureAssembler`])
//! - [`sequence`] - Fixed-length sliding windows ([`SequenceBuilder`])
//!
//! # Example
//!
//! ```
//! use features::{FeatureRegistry, SequenceBuilder};
//! use types::MarketSeries;
//!
//! let prices: Vec<f64> = (0..300).map(|i| 100.0 + (i as f64 * 0.1).sin()).collect();
//! let series = MarketSeries::new(prices, vec![1_000.0; 300]).unwrap();
//!
//! let registry = FeatureRegistry::standard();
//! let builder = SequenceBuilder::new(&registry, 30);
//! let sequences = builder.build_batch(&series, 200, 300, 10);
//!
//! assert_eq!(sequences.len(), 10);
//! assert!(sequences.iter().all(|s| s.timesteps() == 30));
//! ```

pub mod assembler;
pub mod error;
pub mod registry;
pub mod sequence;

pub use assembler::FeatureAssembler;
pub use error::FeatureError;
pub use registry::{
    ComputeFn, FeatureCategory, FeatureDescriptor, FeatureRegistry, detect_feature_count,
};
pub use sequence::SequenceBuilder;
