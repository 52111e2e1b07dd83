//! Trend direction and strength.

use types::{AdxOutput, AroonOutput, Bars, IchimokuOutput};

use super::moving_average::ema_series;
use super::{highest, lowest, tail, true_ranges};
use crate::stats::{argmax_last, argmin_last};

// =============================================================================
// ADX
// =============================================================================

/// Average Directional Index with +DI/-DI, Wilder smoothing throughout.
///
/// Needs `2 * period + 1` bars, else zeros.
pub fn adx(bars: &Bars, period: usize) -> AdxOutput {
    let period = period.max(1);
    let n = bars.len();
    if n < 2 * period + 1 {
        return AdxOutput::default();
    }
    let p = period as f64;

    let tr = true_ranges(bars.high, bars.low, bars.close);
    let (plus_dm, minus_dm): (Vec<f64>, Vec<f64>) = (1..n)
        .map(|i| {
            let up = bars.high[i] - bars.high[i - 1];
            let down = bars.low[i - 1] - bars.low[i];
            let plus = if up > down && up > 0.0 { up } else { 0.0 };
            let minus = if down > up && down > 0.0 { down } else { 0.0 };
            (plus, minus)
        })
        .unzip();

    let directional = |tr: f64, plus: f64, minus: f64| {
        if tr > 0.0 {
            (100.0 * plus / tr, 100.0 * minus / tr)
        } else {
            (0.0, 0.0)
        }
    };
    let dx_of = |plus_di: f64, minus_di: f64| {
        let sum = plus_di + minus_di;
        if sum > 0.0 {
            100.0 * (plus_di - minus_di).abs() / sum
        } else {
            0.0
        }
    };

    let mut sm_tr: f64 = tr[..period].iter().sum();
    let mut sm_plus: f64 = plus_dm[..period].iter().sum();
    let mut sm_minus: f64 = minus_dm[..period].iter().sum();
    let (mut plus_di, mut minus_di) = directional(sm_tr, sm_plus, sm_minus);

    let mut dx = Vec::with_capacity(tr.len() - period + 1);
    dx.push(dx_of(plus_di, minus_di));
    for i in period..tr.len() {
        sm_tr = sm_tr - sm_tr / p + tr[i];
        sm_plus = sm_plus - sm_plus / p + plus_dm[i];
        sm_minus = sm_minus - sm_minus / p + minus_dm[i];
        (plus_di, minus_di) = directional(sm_tr, sm_plus, sm_minus);
        dx.push(dx_of(plus_di, minus_di));
    }

    let mut adx = dx[..period].iter().sum::<f64>() / p;
    for &value in &dx[period..] {
        adx = (adx * (p - 1.0) + value) / p;
    }

    AdxOutput {
        adx,
        plus_di,
        minus_di,
    }
}

// =============================================================================
// Aroon
// =============================================================================

/// Aroon up/down (0-100) from bars since the latest `period`-bar extreme.
///
/// Needs `period + 1` bars, else 50/50.
pub fn aroon(bars: &Bars, period: usize) -> AroonOutput {
    let period = period.max(1);
    if bars.len() < period + 1 {
        return AroonOutput::default();
    }
    let window = bars.tail(period + 1);
    let (Some(hi_idx), Some(lo_idx)) = (argmax_last(window.high), argmin_last(window.low)) else {
        return AroonOutput::default();
    };
    let p = period as f64;
    // Index `period` is the current bar, so the index is also (p - bars since).
    let up = (hi_idx as f64 / p * 100.0).clamp(0.0, 100.0);
    let down = (lo_idx as f64 / p * 100.0).clamp(0.0, 100.0);

    AroonOutput {
        up,
        down,
        oscillator: up - down,
    }
}

// =============================================================================
// Parabolic SAR
// =============================================================================

/// Parabolic stop-and-reverse with acceleration `step` up to `max_step`.
///
/// Fewer than two bars return the last close.
pub fn parabolic_sar(bars: &Bars, step: f64, max_step: f64) -> f64 {
    let n = bars.len();
    if n < 2 {
        return bars.last_close().unwrap_or(0.0);
    }
    let (high, low) = (bars.high, bars.low);

    let mut rising = bars.close[1] >= bars.close[0];
    let mut sar = if rising { low[0] } else { high[0] };
    let mut extreme = if rising { high[0] } else { low[0] };
    let mut af = step;

    for i in 1..n {
        sar += af * (extreme - sar);
        if rising {
            sar = sar.min(low[i - 1]);
            if i >= 2 {
                sar = sar.min(low[i - 2]);
            }
            if low[i] < sar {
                rising = false;
                sar = extreme;
                extreme = low[i];
                af = step;
            } else if high[i] > extreme {
                extreme = high[i];
                af = (af + step).min(max_step);
            }
        } else {
            sar = sar.max(high[i - 1]);
            if i >= 2 {
                sar = sar.max(high[i - 2]);
            }
            if high[i] > sar {
                rising = true;
                sar = extreme;
                extreme = high[i];
                af = step;
            } else if low[i] < extreme {
                extreme = low[i];
                af = (af + step).min(max_step);
            }
        }
    }
    sar
}

// =============================================================================
// Ichimoku
// =============================================================================

const TENKAN: usize = 9;
const KIJUN: usize = 26;
const SENKOU_B: usize = 52;
const DISPLACEMENT: usize = 26;

/// Midpoint of the high/low range over the last `period` bars.
fn range_midpoint(bars: &Bars, period: usize) -> Option<f64> {
    if bars.len() < period {
        return None;
    }
    let window = bars.tail(period);
    Some((highest(window.high)? + lowest(window.low)?) / 2.0)
}

/// Ichimoku lines with the cloud as plotted at the current bar.
///
/// The cloud was projected 26 bars ago, so it needs 78 bars; before that
/// both spans equal the last close and the position is 0. Tenkan and Kijun
/// fall back to the last close when their own window is short.
pub fn ichimoku(bars: &Bars) -> IchimokuOutput {
    let Some(price) = bars.last_close() else {
        return IchimokuOutput::default();
    };
    let tenkan = range_midpoint(bars, TENKAN).unwrap_or(price);
    let kijun = range_midpoint(bars, KIJUN).unwrap_or(price);

    if bars.len() < SENKOU_B + DISPLACEMENT {
        return IchimokuOutput {
            tenkan,
            kijun,
            senkou_a: price,
            senkou_b: price,
            cloud_position: 0.0,
        };
    }

    let past_len = bars.len() - DISPLACEMENT;
    let past = Bars {
        close: &bars.close[..past_len],
        volume: &bars.volume[..past_len],
        high: &bars.high[..past_len],
        low: &bars.low[..past_len],
    };
    let past_tenkan = range_midpoint(&past, TENKAN).unwrap_or(price);
    let past_kijun = range_midpoint(&past, KIJUN).unwrap_or(price);
    let senkou_a = (past_tenkan + past_kijun) / 2.0;
    let senkou_b = range_midpoint(&past, SENKOU_B).unwrap_or(price);

    let (top, bottom) = (senkou_a.max(senkou_b), senkou_a.min(senkou_b));
    let cloud_position = if price > top {
        1.0
    } else if price < bottom {
        -1.0
    } else {
        0.0
    };

    IchimokuOutput {
        tenkan,
        kijun,
        senkou_a,
        senkou_b,
        cloud_position,
    }
}

// =============================================================================
// Mass Index
// =============================================================================

/// Mass index: sum over `sum_period` bars of `EMA9(range) / EMA9(EMA9(range))`.
///
/// A zero double-smoothed range counts as a ratio of 1. Needs `sum_period`
/// bars, else `sum_period` (every ratio 1).
pub fn mass_index(bars: &Bars, ema_period: usize, sum_period: usize) -> f64 {
    let neutral = sum_period as f64;
    if bars.len() < sum_period.max(1) {
        return neutral;
    }
    let ranges: Vec<f64> = bars
        .high
        .iter()
        .zip(bars.low)
        .map(|(h, l)| h - l)
        .collect();
    let single = ema_series(&ranges, ema_period);
    let double = ema_series(&single, ema_period);
    let ratios: Vec<f64> = single
        .iter()
        .zip(&double)
        .map(|(s, d)| if *d > 0.0 { s / d } else { 1.0 })
        .collect();
    tail(&ratios, sum_period).iter().sum()
}
