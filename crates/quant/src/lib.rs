//! Technical indicator library for the sequence dataset pipeline.
//!
//! Every indicator is a pure, total function over trailing windows of
//! closes, volumes and (possibly approximated) highs/lows. Windows that are
//! too short, or inputs that would divide by zero, produce a documented
//! neutral value instead of `NaN`/`Inf`, so the feature assembler never has
//! to special-case an indicator.
//!
//! # Modules
//!
//! - [`indicators`] - Indicator functions grouped by family
//! - [`stats`] - Statistical utilities (mean, median, MAD, correlation)
//!
//! # Example
//!
//! ```
//! use quant::indicators::{momentum, moving_average};
//!
//! let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
//! let sma = moving_average::sma(&closes, 20);
//! let rsi = momentum::rsi(&closes, 14);
//! assert!(sma.is_finite());
//! assert!((0.0..=100.0).contains(&rsi));
//! ```

pub mod indicators;
pub mod stats;

pub use indicators::{
    cycles, levels, momentum, moving_average, patterns, trend, volatility, volume,
};
