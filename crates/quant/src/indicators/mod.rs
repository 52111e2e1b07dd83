//! Technical indicators for feature engineering.
//!
//! Indicators are plain functions over slices (or a [`types::Bars`] window
//! when more than one input series is needed). Each function documents its
//! neutral value for short or degenerate windows.
//!
//! # Families
//! - [`moving_average`] - SMA, EMA, WMA, Hull, Kaufman, Rainbow
//! - [`momentum`] - RSI, StochRSI, Williams %R, CCI, MFI, TSI, PMO, Fisher, AC, MACD
//! - [`trend`] - ADX, Aroon, Parabolic SAR, Ichimoku, Mass Index
//! - [`volatility`] - Bollinger, ATR, Keltner, Donchian, price channel, historical volatility
//! - [`volume`] - VWAP, VWMA, VPT, CMF, Chaikin, Elder force index, Klinger
//! - [`cycles`] - MESA sine wave
//! - [`levels`] - Camarilla pivots, Fibonacci retracement
//! - [`patterns`] - Double/triple tops and bottoms, head-and-shoulders

pub mod cycles;
pub mod levels;
pub mod momentum;
pub mod moving_average;
pub mod patterns;
pub mod trend;
pub mod volatility;
pub mod volume;

// =============================================================================
// Window helpers
// =============================================================================

/// The last `n` values of a slice (all of them when shorter).
#[inline]
pub(crate) fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Largest value, `None` when empty.
#[inline]
pub(crate) fn highest(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Smallest value, `None` when empty.
#[inline]
pub(crate) fn lowest(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// True range of every bar after the first.
///
/// `max(high - low, |high - prev_close|, |low - prev_close|)`. With highs and
/// lows approximated from closes this is `|close[i] - close[i-1]|`.
pub(crate) fn true_ranges(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    (1..close.len())
        .map(|i| {
            let prev_close = close[i - 1];
            (high[i] - low[i])
                .max((high[i] - prev_close).abs())
                .max((low[i] - prev_close).abs())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_clips() {
        assert_eq!(tail(&[1.0, 2.0, 3.0], 2), &[2.0, 3.0]);
        assert_eq!(tail(&[1.0], 5), &[1.0]);
    }

    #[test]
    fn test_true_range_matches_close_change_for_approximated_bars() {
        let close = [100.0, 102.0, 99.0, 99.5];
        let high = [100.0, 102.0, 102.0, 99.5];
        let low = [100.0, 100.0, 99.0, 99.0];
        let tr = true_ranges(&high, &low, &close);
        assert_eq!(tr, vec![2.0, 3.0, 0.5]);
    }

    #[test]
    fn test_extremes_empty() {
        assert_eq!(highest(&[]), None);
        assert_eq!(lowest(&[3.0, -1.0, 2.0]), Some(-1.0));
    }
}
