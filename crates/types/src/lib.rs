//! Core types for the sequence dataset pipeline.
//!
//! This crate provides the shared data model used across the workspace:
//! the input market series, feature vectors and sequences, labeled samples
//! and datasets, normalization statistics, pipeline configuration, and the
//! library error type.
//!
//! # Modules
//!
//! - [`series`] - Market series (prices, volumes, high/low) and trailing [`Bars`] views
//! - [`sequence`] - Feature vectors and fixed-length [`Sequence`]s
//! - [`dataset`] - Labels, samples and [`Dataset`]
//! - [`stats`] - [`NormalizationStats`] and their JSON encoding
//! - [`indicators`] - Multi-value indicator outputs (MACD, Bollinger, ...)
//! - [`config`] - [`PipelineConfig`] and its option enums
//! - [`error`] - [`PipelineError`]

pub mod config;
pub mod dataset;
pub mod error;
pub mod indicators;
pub mod sequence;
pub mod series;
pub mod stats;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{
    BalancingStrategy, FeatureSelection, LabelConfig, PipelineConfig, StatsMethod,
};
pub use dataset::{ClassCounts, Dataset, Label, Sample};
pub use error::{PipelineError, Result};
pub use indicators::{
    AdxOutput, AroonOutput, BollingerOutput, CamarillaOutput, ChannelOutput, FibonacciOutput,
    IchimokuOutput, MacdOutput, SineWaveOutput,
};
pub use sequence::{FeatureVector, Sequence};
pub use series::{Bars, MarketSeries};
pub use stats::NormalizationStats;

// =============================================================================
// Constants
// =============================================================================

/// Consistency constant converting a MAD into a normal-equivalent std dev.
pub const MAD_TO_STD: f64 = 1.4826;

/// Trading days per year, used when annualising volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
