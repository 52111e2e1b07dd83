//! Market input series and trailing window views.
//!
//! A [`MarketSeries`] is provided once by the data collaborator and stays
//! read-only for the whole pipeline. Indicators never see the series
//! directly; they receive a [`Bars`] view over the trailing window ending at
//! the day being computed.

use crate::error::{PipelineError, Result};

// =============================================================================
// MarketSeries
// =============================================================================

/// Chronological prices and volumes with high/low companions.
///
/// When highs and lows are not supplied they are approximated from adjacent
/// closes: `high[i] = max(close[i-1], close[i])` and
/// `low[i] = min(close[i-1], close[i])`. Under that approximation the true
/// range of a bar equals the absolute close-to-close change.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSeries {
    prices: Vec<f64>,
    volumes: Vec<f64>,
    highs: Vec<f64>,
    lows: Vec<f64>,
}

impl MarketSeries {
    /// Create a series from closes and volumes, approximating highs/lows.
    pub fn new(prices: Vec<f64>, volumes: Vec<f64>) -> Result<Self> {
        check_lengths(&prices, &volumes, "volumes")?;
        let (highs, lows) = approximate_high_low(&prices);
        Ok(Self {
            prices,
            volumes,
            highs,
            lows,
        })
    }

    /// Create a series with explicit highs and lows.
    pub fn with_high_low(
        prices: Vec<f64>,
        volumes: Vec<f64>,
        highs: Vec<f64>,
        lows: Vec<f64>,
    ) -> Result<Self> {
        check_lengths(&prices, &volumes, "volumes")?;
        check_lengths(&prices, &highs, "highs")?;
        check_lengths(&prices, &lows, "lows")?;
        Ok(Self {
            prices,
            volumes,
            highs,
            lows,
        })
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always false for a constructed series; kept for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    #[inline]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    #[inline]
    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    #[inline]
    pub fn highs(&self) -> &[f64] {
        &self.highs
    }

    #[inline]
    pub fn lows(&self) -> &[f64] {
        &self.lows
    }

    /// Trailing window of at most `lookback` bars ending at `end` (inclusive).
    ///
    /// The window is clipped at the start of the series. Returns `None` when
    /// `end` is past the last observation.
    pub fn window(&self, end: usize, lookback: usize) -> Option<Bars<'_>> {
        if end >= self.len() {
            return None;
        }
        let start = (end + 1).saturating_sub(lookback.max(1));
        Some(Bars {
            close: &self.prices[start..=end],
            volume: &self.volumes[start..=end],
            high: &self.highs[start..=end],
            low: &self.lows[start..=end],
        })
    }
}

fn check_lengths(prices: &[f64], other: &[f64], what: &'static str) -> Result<()> {
    if prices.is_empty() {
        return Err(PipelineError::EmptySeries);
    }
    if prices.len() != other.len() {
        return Err(PipelineError::LengthMismatch {
            prices: prices.len(),
            other: other.len(),
            what,
        });
    }
    Ok(())
}

fn approximate_high_low(prices: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut highs = Vec::with_capacity(prices.len());
    let mut lows = Vec::with_capacity(prices.len());
    for (i, &close) in prices.iter().enumerate() {
        let prev = if i == 0 { close } else { prices[i - 1] };
        highs.push(close.max(prev));
        lows.push(close.min(prev));
    }
    (highs, lows)
}

// =============================================================================
// Bars
// =============================================================================

/// Borrowed trailing window of bars, oldest first.
///
/// All four slices have the same length.
#[derive(Debug, Clone, Copy)]
pub struct Bars<'a> {
    pub close: &'a [f64],
    pub volume: &'a [f64],
    pub high: &'a [f64],
    pub low: &'a [f64],
}

impl<'a> Bars<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Most recent close, if any.
    #[inline]
    pub fn last_close(&self) -> Option<f64> {
        self.close.last().copied()
    }

    /// The last `n` bars (or all of them when fewer exist).
    pub fn tail(&self, n: usize) -> Bars<'a> {
        let start = self.len().saturating_sub(n);
        Bars {
            close: &self.close[start..],
            volume: &self.volume[start..],
            high: &self.high[start..],
            low: &self.low[start..],
        }
    }

    /// Typical price `(high + low + close) / 3` per bar.
    pub fn typical_prices(&self) -> Vec<f64> {
        self.close
            .iter()
            .zip(self.high)
            .zip(self.low)
            .map(|((c, h), l)| (h + l + c) / 3.0)
            .collect()
    }

    /// Median price `(high + low) / 2` per bar.
    pub fn median_prices(&self) -> Vec<f64> {
        self.high
            .iter()
            .zip(self.low)
            .map(|(h, l)| (h + l) / 2.0)
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_rejected() {
        let err = MarketSeries::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, PipelineError::LengthMismatch { .. }));
    }

    #[test]
    fn test_empty_series_rejected() {
        let err = MarketSeries::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, PipelineError::EmptySeries));
    }

    #[test]
    fn test_high_low_approximation() {
        let series = MarketSeries::new(vec![10.0, 12.0, 11.0], vec![1.0; 3]).unwrap();
        assert_eq!(series.highs(), &[10.0, 12.0, 12.0]);
        assert_eq!(series.lows(), &[10.0, 10.0, 11.0]);
    }

    #[test]
    fn test_window_clipped_at_start() {
        let series = MarketSeries::new((0..10).map(f64::from).collect(), vec![1.0; 10]).unwrap();

        let bars = series.window(3, 5).unwrap();
        assert_eq!(bars.close, &[0.0, 1.0, 2.0, 3.0]);

        let bars = series.window(9, 3).unwrap();
        assert_eq!(bars.close, &[7.0, 8.0, 9.0]);
        assert_eq!(bars.tail(2).close, &[8.0, 9.0]);

        assert!(series.window(10, 3).is_none());
    }
}
