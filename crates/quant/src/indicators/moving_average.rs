//! Moving averages.
//!
//! Averages fall back to the most recent value when the window is shorter
//! than the period, and to `0.0` for an empty window.

use super::tail;

// =============================================================================
// Simple & Exponential
// =============================================================================

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> f64 {
    let period = period.max(1);
    match values.last() {
        None => 0.0,
        Some(&last) if values.len() < period => last,
        Some(_) => tail(values, period).iter().sum::<f64>() / period as f64,
    }
}

/// SMA at every index; indices with short history carry the raw value.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 < period {
            out.push(v);
        } else {
            out.push(sum / period as f64);
        }
    }
    out
}

/// Smoothing factor `2 / (period + 1)`.
#[inline]
pub fn ema_alpha(period: usize) -> f64 {
    2.0 / (period.max(1) as f64 + 1.0)
}

/// Exponential moving average seeded with the first value of the window.
pub fn ema(values: &[f64], period: usize) -> f64 {
    smoothed_last(values, ema_alpha(period))
}

/// EMA at every index of the window.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    smoothed_series(values, ema_alpha(period))
}

/// Exponential smoothing with an explicit factor, seeded with `values[0]`.
pub fn smoothed_series(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    if let Some(&first) = iter.next() {
        let mut current = first;
        out.push(current);
        for &v in iter {
            current = alpha * v + (1.0 - alpha) * current;
            out.push(current);
        }
    }
    out
}

fn smoothed_last(values: &[f64], alpha: f64) -> f64 {
    let Some((&first, rest)) = values.split_first() else {
        return 0.0;
    };
    rest.iter()
        .fold(first, |current, &v| alpha * v + (1.0 - alpha) * current)
}

// =============================================================================
// Weighted & Adaptive
// =============================================================================

/// Linearly weighted moving average (weights `1..=period`, newest heaviest).
pub fn wma(values: &[f64], period: usize) -> f64 {
    let period = period.max(1);
    match values.last() {
        None => 0.0,
        Some(&last) if values.len() < period => last,
        Some(_) => {
            let window = tail(values, period);
            let weighted: f64 = window
                .iter()
                .enumerate()
                .map(|(i, v)| (i + 1) as f64 * v)
                .sum();
            let weights = (period * (period + 1)) as f64 / 2.0;
            weighted / weights
        }
    }
}

/// Hull moving average: `WMA(2·WMA(n/2) − WMA(n), round(√n))`.
pub fn hull_ma(values: &[f64], period: usize) -> f64 {
    let period = period.max(1);
    let half = (period / 2).max(1);
    let smoothing = ((period as f64).sqrt().round() as usize).max(1);
    let Some(&last) = values.last() else {
        return 0.0;
    };
    if values.len() < period + smoothing - 1 {
        return last;
    }

    let first_end = values.len() - smoothing;
    let raw: Vec<f64> = (first_end..values.len())
        .map(|end| {
            let history = &values[..=end];
            2.0 * wma(history, half) - wma(history, period)
        })
        .collect();
    wma(&raw, smoothing)
}

/// Kaufman adaptive moving average.
///
/// The efficiency ratio over `period` changes blends between the `fast` and
/// `slow` EMA constants. Seeded with the value at `period - 1`.
pub fn kama(values: &[f64], period: usize, fast: usize, slow: usize) -> f64 {
    let period = period.max(1);
    let Some(&last) = values.last() else {
        return 0.0;
    };
    if values.len() <= period {
        return last;
    }

    let fast_sc = ema_alpha(fast);
    let slow_sc = ema_alpha(slow);
    let mut kama = values[period - 1];
    for i in period..values.len() {
        let change = (values[i] - values[i - period]).abs();
        let volatility: f64 = values[i - period..=i]
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .sum();
        let efficiency = if volatility > 0.0 {
            change / volatility
        } else {
            0.0
        };
        let sc = (efficiency * (fast_sc - slow_sc) + slow_sc).powi(2);
        kama += sc * (values[i] - kama);
    }
    kama
}

/// Rainbow moving average: mean of `levels` recursively applied SMAs.
pub fn rainbow_ma(values: &[f64], levels: usize, period: usize) -> f64 {
    if values.is_empty() || levels == 0 {
        return values.last().copied().unwrap_or(0.0);
    }
    let mut layer = values.to_vec();
    let mut total = 0.0;
    for _ in 0..levels {
        layer = sma_series(&layer, period);
        total += layer.last().copied().unwrap_or(0.0);
    }
    total / levels as f64
}
