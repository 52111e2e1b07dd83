//! Momentum oscillators.

use types::{Bars, MacdOutput};

use super::moving_average::{ema_series, sma, smoothed_series};
use super::{highest, lowest, tail};
use crate::stats::mean;

// =============================================================================
// RSI family
// =============================================================================

/// RSI from Wilder-smoothed average gain and loss.
///
/// A zero average loss is infinite relative strength and maps to 100, even
/// when the average gain is also zero (flat series).
#[inline]
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss > 0.0 {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    } else {
        100.0
    }
}

/// RSI at every index of the window.
///
/// The first `period` indices have too little history and hold the neutral
/// value 50. Index `period` uses the simple average of the first `period`
/// changes; later indices apply Wilder smoothing.
pub fn rsi_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![50.0; values.len()];
    if period == 0 || values.len() < period + 1 {
        return out;
    }

    let split = |change: f64| {
        if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        }
    };

    let p = period as f64;
    let (mut avg_gain, mut avg_loss) = values[..=period]
        .windows(2)
        .map(|w| split(w[1] - w[0]))
        .fold((0.0, 0.0), |(g, l), (gain, loss)| (g + gain, l + loss));
    avg_gain /= p;
    avg_loss /= p;
    out[period] = rsi_value(avg_gain, avg_loss);

    for i in period + 1..values.len() {
        let (gain, loss) = split(values[i] - values[i - 1]);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        out[i] = rsi_value(avg_gain, avg_loss);
    }
    out
}

/// Relative Strength Index (0-100). Needs `period + 1` values, else 50.
pub fn rsi(values: &[f64], period: usize) -> f64 {
    rsi_series(values, period).last().copied().unwrap_or(50.0)
}

/// Stochastic RSI (0-100): position of the current RSI within its range
/// over the last `stoch_period` RSI values.
///
/// Needs `rsi_period + stoch_period` values, else 50. A flat RSI range is 50.
pub fn stoch_rsi(values: &[f64], rsi_period: usize, stoch_period: usize) -> f64 {
    let stoch_period = stoch_period.max(1);
    if values.len() < rsi_period + stoch_period {
        return 50.0;
    }
    let series = rsi_series(values, rsi_period);
    let window = tail(&series, stoch_period);
    let (Some(hi), Some(lo), Some(&current)) = (highest(window), lowest(window), window.last())
    else {
        return 50.0;
    };
    let range = hi - lo;
    if range > 0.0 {
        ((current - lo) / range * 100.0).clamp(0.0, 100.0)
    } else {
        50.0
    }
}

// =============================================================================
// Range oscillators
// =============================================================================

/// Williams %R (-100..0). Needs `period` bars, else -50; flat range is -50.
pub fn williams_r(bars: &Bars, period: usize) -> f64 {
    let period = period.max(1);
    if bars.len() < period {
        return -50.0;
    }
    let window = bars.tail(period);
    let (Some(hh), Some(ll), Some(close)) = (
        highest(window.high),
        lowest(window.low),
        window.last_close(),
    ) else {
        return -50.0;
    };
    let range = hh - ll;
    if range > 0.0 {
        ((hh - close) / range * -100.0).clamp(-100.0, 0.0)
    } else {
        -50.0
    }
}

/// Commodity Channel Index over typical prices.
///
/// Needs `period` bars, else 0. Zero mean deviation is 0.
pub fn cci(bars: &Bars, period: usize) -> f64 {
    let period = period.max(1);
    if bars.len() < period {
        return 0.0;
    }
    let typical = bars.tail(period).typical_prices();
    let (Some(avg), Some(&current)) = (mean(&typical), typical.last()) else {
        return 0.0;
    };
    let mean_dev = typical.iter().map(|tp| (tp - avg).abs()).sum::<f64>() / period as f64;
    if mean_dev > 0.0 {
        (current - avg) / (0.015 * mean_dev)
    } else {
        0.0
    }
}

/// Money Flow Index (0-100).
///
/// Needs `period + 1` bars, else 50. No negative flow is 100, no flow at all
/// is 50.
pub fn mfi(bars: &Bars, period: usize) -> f64 {
    let period = period.max(1);
    if bars.len() < period + 1 {
        return 50.0;
    }
    let window = bars.tail(period + 1);
    let typical = window.typical_prices();

    let (mut positive, mut negative) = (0.0, 0.0);
    for i in 1..typical.len() {
        let raw_flow = typical[i] * window.volume[i];
        if typical[i] > typical[i - 1] {
            positive += raw_flow;
        } else if typical[i] < typical[i - 1] {
            negative += raw_flow;
        }
    }

    if negative > 0.0 {
        (100.0 - 100.0 / (1.0 + positive / negative)).clamp(0.0, 100.0)
    } else if positive > 0.0 {
        100.0
    } else {
        50.0
    }
}

// =============================================================================
// Smoothed momentum
// =============================================================================

/// True Strength Index: double-smoothed momentum over double-smoothed
/// absolute momentum, times 100. Zero denominator is 0.
pub fn tsi(values: &[f64], long: usize, short: usize) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let momentum: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let magnitude: Vec<f64> = momentum.iter().map(|m| m.abs()).collect();

    let double = |series: &[f64]| {
        ema_series(&ema_series(series, long), short)
            .last()
            .copied()
            .unwrap_or(0.0)
    };
    let numerator = double(&momentum);
    let denominator = double(&magnitude);
    if denominator > 0.0 {
        100.0 * numerator / denominator
    } else {
        0.0
    }
}

/// Price Momentum Oscillator.
///
/// One-bar rate of change smoothed with factor `2/first`, scaled by 10, then
/// smoothed again with `2/second`.
pub fn pmo(values: &[f64], first: usize, second: usize) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let roc: Vec<f64> = values
        .windows(2)
        .map(|w| {
            if w[0] != 0.0 {
                (w[1] / w[0] - 1.0) * 100.0
            } else {
                0.0
            }
        })
        .collect();
    let first_pass: Vec<f64> = smoothed_series(&roc, 2.0 / first.max(1) as f64)
        .into_iter()
        .map(|v| v * 10.0)
        .collect();
    smoothed_series(&first_pass, 2.0 / second.max(1) as f64)
        .last()
        .copied()
        .unwrap_or(0.0)
}

/// Ehlers Fisher transform of the median price. Needs `period` bars, else 0.
pub fn fisher_transform(bars: &Bars, period: usize) -> f64 {
    let period = period.max(1);
    if bars.len() < period {
        return 0.0;
    }
    let median = bars.median_prices();

    let mut value = 0.0;
    let mut fisher = 0.0;
    for end in period - 1..median.len() {
        let window = &median[end + 1 - period..=end];
        let (hi, lo) = (
            highest(window).unwrap_or(median[end]),
            lowest(window).unwrap_or(median[end]),
        );
        let range = hi - lo;
        let raw = if range > 0.0 {
            (median[end] - lo) / range - 0.5
        } else {
            0.0
        };
        value = (0.66 * raw + 0.67 * value).clamp(-0.999, 0.999);
        fisher = 0.5 * ((1.0 + value) / (1.0 - value)).ln() + 0.5 * fisher;
    }
    fisher
}

/// Bill Williams accelerator oscillator.
///
/// `AO = SMA5(median) − SMA34(median)` and `AC = AO − SMA5(AO)`. Needs 38
/// bars, else 0.
pub fn accelerator_oscillator(bars: &Bars) -> f64 {
    const FAST: usize = 5;
    const SLOW: usize = 34;
    if bars.len() < SLOW + FAST - 1 {
        return 0.0;
    }
    let median = bars.median_prices();
    let awesome: Vec<f64> = (median.len() - FAST..median.len())
        .map(|end| {
            let history = &median[..=end];
            sma(history, FAST) - sma(history, SLOW)
        })
        .collect();
    let current = awesome.last().copied().unwrap_or(0.0);
    current - mean(&awesome).unwrap_or(0.0)
}

// =============================================================================
// MACD
// =============================================================================

/// Moving Average Convergence Divergence.
///
/// The line is `EMA(fast) − EMA(slow)` computed as series over the window;
/// the signal is an EMA of that line. Needs `slow` values, else zeros.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdOutput {
    if values.is_empty() || values.len() < slow {
        return MacdOutput::default();
    }
    let fast_series = ema_series(values, fast);
    let slow_series = ema_series(values, slow);
    let line: Vec<f64> = fast_series
        .iter()
        .zip(&slow_series)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_series(&line, signal).last().copied().unwrap_or(0.0);
    let macd_line = line.last().copied().unwrap_or(0.0);

    MacdOutput {
        macd_line,
        signal_line,
        histogram: macd_line - signal_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_walk(seed: u64, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut price = 100.0;
        (0..n)
            .map(|_| {
                price *= 1.0 + rng.random_range(-0.03..0.03);
                price
            })
            .collect()
    }

    fn approximated(close: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let high = (0..close.len())
            .map(|i| close[i].max(close[i.saturating_sub(1)]))
            .collect();
        let low = (0..close.len())
            .map(|i| close[i].min(close[i.saturating_sub(1)]))
            .collect();
        (high, low)
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!((rsi(&prices, 14) - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_rsi_all_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        assert!(rsi(&prices, 14).abs() < 0.01);
    }

    #[test]
    fn test_rsi_flat_series_is_100() {
        // Zero average loss counts as infinite relative strength even when
        // there are no gains either.
        assert_eq!(rsi(&[100.0; 30], 14), 100.0);
    }

    #[test]
    fn test_rsi_short_window_is_neutral() {
        assert_eq!(rsi(&[100.0, 101.0, 99.0], 14), 50.0);
        assert_eq!(rsi(&[], 14), 50.0);
    }

    #[test]
    fn test_oscillators_stay_in_range() {
        for seed in 0..20 {
            let close = random_walk(seed, 120);
            let volume = vec![1_000.0; close.len()];
            let (high, low) = approximated(&close);
            for end in 1..=close.len() {
                let bars = Bars {
                    close: &close[..end],
                    volume: &volume[..end],
                    high: &high[..end],
                    low: &low[..end],
                };
                let r = rsi(bars.close, 14);
                let s = stoch_rsi(bars.close, 14, 14);
                let w = williams_r(&bars, 14);
                let m = mfi(&bars, 14);
                assert!((0.0..=100.0).contains(&r), "rsi {r}");
                assert!((0.0..=100.0).contains(&s), "stoch rsi {s}");
                assert!((-100.0..=0.0).contains(&w), "williams %r {w}");
                assert!((0.0..=100.0).contains(&m), "mfi {m}");
            }
        }
    }

    #[test]
    fn test_stoch_rsi_flat_range_is_neutral() {
        assert_eq!(stoch_rsi(&[50.0; 40], 14, 14), 50.0);
        assert_eq!(stoch_rsi(&[50.0; 10], 14, 14), 50.0);
    }

    #[test]
    fn test_williams_r_at_high_is_zero() {
        let close = [1.0, 2.0, 3.0, 4.0];
        let (high, low) = approximated(&close);
        let volume = [1.0; 4];
        let bars = Bars {
            close: &close,
            volume: &volume,
            high: &high,
            low: &low,
        };
        assert_eq!(williams_r(&bars, 4), 0.0);
    }

    #[test]
    fn test_cci_flat_is_zero() {
        let close = [10.0; 25];
        let bars = Bars {
            close: &close,
            volume: &close,
            high: &close,
            low: &close,
        };
        assert_eq!(cci(&bars, 20), 0.0);
        assert_eq!(mfi(&bars, 14), 50.0);
        assert_eq!(fisher_transform(&bars, 10), 0.0);
    }

    #[test]
    fn test_tsi_trend_sign() {
        let up: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let down: Vec<f64> = up.iter().rev().copied().collect();
        assert!((tsi(&up, 25, 13) - 100.0).abs() < 1e-9);
        assert!((tsi(&down, 25, 13) + 100.0).abs() < 1e-9);
        assert_eq!(tsi(&[100.0; 10], 25, 13), 0.0);
    }

    #[test]
    fn test_pmo_flat_is_zero() {
        assert_eq!(pmo(&[50.0; 40], 35, 20), 0.0);
        assert!(pmo(&random_walk(3, 80), 35, 20).is_finite());
    }

    #[test]
    fn test_accelerator_needs_history() {
        let close = random_walk(9, 30);
        let (high, low) = approximated(&close);
        let bars = Bars {
            close: &close,
            volume: &close,
            high: &high,
            low: &low,
        };
        assert_eq!(accelerator_oscillator(&bars), 0.0);
    }

    #[test]
    fn test_macd_components() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let out = macd(&prices, 12, 26, 9);
        assert!(out.macd_line > 0.0);
        assert!((out.histogram - (out.macd_line - out.signal_line)).abs() < 1e-12);
        assert_eq!(macd(&prices[..20], 12, 26, 9), MacdOutput::default());
    }
}
