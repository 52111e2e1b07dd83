//! Volume-weighted indicators and accumulation measures.
//!
//! Cumulative measures (VPT, ADL and the oscillators built on it) start
//! from zero at the first bar of the window they are given.

use types::Bars;

use super::moving_average::{ema, sma};
use super::tail;

/// Volume-weighted average typical price of the last `period` bars.
///
/// Zero total volume falls back to the last close.
pub fn vwap(bars: &Bars, period: usize) -> f64 {
    let Some(price) = bars.last_close() else {
        return 0.0;
    };
    let window = bars.tail(period.max(1));
    let typical = window.typical_prices();
    let total_volume: f64 = window.volume.iter().sum();
    if total_volume > 0.0 {
        typical
            .iter()
            .zip(window.volume)
            .map(|(tp, v)| tp * v)
            .sum::<f64>()
            / total_volume
    } else {
        price
    }
}

/// Volume-weighted moving average of closes. Zero volume falls back to SMA.
pub fn vwma(close: &[f64], volume: &[f64], period: usize) -> f64 {
    let period = period.max(1);
    let closes = tail(close, period);
    let volumes = tail(volume, period);
    let total_volume: f64 = volumes.iter().sum();
    if total_volume > 0.0 {
        closes.iter().zip(volumes).map(|(c, v)| c * v).sum::<f64>() / total_volume
    } else {
        sma(close, period)
    }
}

/// Volume price trend accumulated over the window.
pub fn vpt(close: &[f64], volume: &[f64]) -> f64 {
    (1..close.len().min(volume.len()))
        .filter(|&i| close[i - 1] != 0.0)
        .map(|i| volume[i] * (close[i] - close[i - 1]) / close[i - 1])
        .sum()
}

/// Close location value times volume; 0 when the bar has no range.
#[inline]
fn money_flow_volume(close: f64, high: f64, low: f64, volume: f64) -> f64 {
    let range = high - low;
    if range > 0.0 {
        ((close - low) - (high - close)) / range * volume
    } else {
        0.0
    }
}

/// Accumulation/distribution line at every bar of the window.
pub fn adl_series(bars: &Bars) -> Vec<f64> {
    let mut total = 0.0;
    (0..bars.len())
        .map(|i| {
            total += money_flow_volume(bars.close[i], bars.high[i], bars.low[i], bars.volume[i]);
            total
        })
        .collect()
}

/// Chaikin money flow over the last `period` bars. Zero volume is 0.
pub fn cmf(bars: &Bars, period: usize) -> f64 {
    let window = bars.tail(period.max(1));
    let total_volume: f64 = window.volume.iter().sum();
    if total_volume <= 0.0 {
        return 0.0;
    }
    let flow: f64 = (0..window.len())
        .map(|i| {
            money_flow_volume(
                window.close[i],
                window.high[i],
                window.low[i],
                window.volume[i],
            )
        })
        .sum();
    flow / total_volume
}

/// Chaikin oscillator: `EMA(fast) − EMA(slow)` of the A/D line.
pub fn chaikin_oscillator(bars: &Bars, fast: usize, slow: usize) -> f64 {
    let adl = adl_series(bars);
    ema(&adl, fast) - ema(&adl, slow)
}

/// Elder force index: EMA of `Δclose · volume`. Needs two bars, else 0.
pub fn elder_force_index(close: &[f64], volume: &[f64], period: usize) -> f64 {
    let n = close.len().min(volume.len());
    if n < 2 {
        return 0.0;
    }
    let force: Vec<f64> = (1..n)
        .map(|i| (close[i] - close[i - 1]) * volume[i])
        .collect();
    ema(&force, period)
}

/// Klinger volume oscillator, simplified volume-force form.
///
/// Volume force is the bar volume signed by the direction of the typical
/// price; the oscillator is `EMA(fast) − EMA(slow)` of that force.
pub fn klinger(bars: &Bars, fast: usize, slow: usize) -> f64 {
    if bars.len() < 2 {
        return 0.0;
    }
    let typical = bars.typical_prices();
    let force: Vec<f64> = (1..typical.len())
        .map(|i| {
            if typical[i] > typical[i - 1] {
                bars.volume[i]
            } else {
                -bars.volume[i]
            }
        })
        .collect();
    ema(&force, fast) - ema(&force, slow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars_of<'a>(close: &'a [f64], volume: &'a [f64], high: &'a [f64], low: &'a [f64]) -> Bars<'a> {
        Bars {
            close,
            volume,
            high,
            low,
        }
    }

    #[test]
    fn test_vwap_weights_by_volume() {
        let close = [10.0, 20.0];
        let volume = [1.0, 3.0];
        let bars = bars_of(&close, &volume, &close, &close);
        assert!((vwap(&bars, 20) - 17.5).abs() < 1e-12);

        let zero = [0.0, 0.0];
        let bars = bars_of(&close, &zero, &close, &close);
        assert_eq!(vwap(&bars, 20), 20.0);
    }

    #[test]
    fn test_vwma_zero_volume_falls_back_to_sma() {
        let close = [10.0, 20.0, 30.0];
        assert!((vwma(&close, &[0.0; 3], 3) - 20.0).abs() < 1e-12);
        assert!((vwma(&close, &[1.0, 0.0, 1.0], 3) - 20.0).abs() < 1e-12);
        assert!((vwma(&close, &[0.0, 0.0, 5.0], 3) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_vpt_accumulates() {
        // +10% on 100 volume, -10% on 50 volume
        let v = vpt(&[100.0, 110.0, 99.0], &[0.0, 100.0, 50.0]);
        assert!((v - (10.0 - 5.0)).abs() < 1e-9);
        assert_eq!(vpt(&[100.0], &[5.0]), 0.0);
    }

    #[test]
    fn test_cmf_close_at_high() {
        let close = [10.0, 12.0];
        let high = [10.0, 12.0];
        let low = [9.0, 10.0];
        let volume = [100.0, 100.0];
        let bars = bars_of(&close, &volume, &high, &low);
        assert!((cmf(&bars, 20) - 1.0).abs() < 1e-12);
        assert_eq!(adl_series(&bars), vec![100.0, 200.0]);
    }

    #[test]
    fn test_force_and_klinger_on_flat_series() {
        let close = [10.0; 30];
        let volume = [500.0; 30];
        let bars = bars_of(&close, &volume, &close, &close);
        assert_eq!(elder_force_index(&close, &volume, 13), 0.0);
        assert_eq!(chaikin_oscillator(&bars, 3, 10), 0.0);
        // Flat typical price counts as down volume throughout.
        assert!(klinger(&bars, 34, 55).abs() < 1e-9);
    }
}
