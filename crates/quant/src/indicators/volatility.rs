//! Volatility measures and price envelopes.

use types::{Bars, BollingerOutput, ChannelOutput, TRADING_DAYS_PER_YEAR};

use super::moving_average::ema;
use super::{highest, lowest, tail, true_ranges};
use crate::stats::{log_returns, mean, sample_std_dev, std_dev};

// =============================================================================
// Bollinger Bands
// =============================================================================

/// Bollinger Bands: SMA ± `k` population standard deviations.
///
/// With fewer than `period` values the bands collapse onto the last price
/// with zero width and %B of 0.5.
pub fn bollinger(values: &[f64], period: usize, k: f64) -> BollingerOutput {
    let period = period.max(1);
    let Some(&price) = values.last() else {
        return BollingerOutput {
            percent_b: 0.5,
            ..BollingerOutput::default()
        };
    };
    if values.len() < period {
        return BollingerOutput {
            upper: price,
            middle: price,
            lower: price,
            width: 0.0,
            percent_b: 0.5,
        };
    }

    let window = tail(values, period);
    let middle = mean(window).unwrap_or(price);
    let sd = std_dev(window).unwrap_or(0.0);
    let upper = middle + k * sd;
    let lower = middle - k * sd;

    // Band width as percentage of middle band
    let width = if middle != 0.0 {
        (upper - lower) / middle * 100.0
    } else {
        0.0
    };
    // %B: 0 = at lower band, 1 = at upper band
    let percent_b = if upper > lower {
        (price - lower) / (upper - lower)
    } else {
        0.5
    };

    BollingerOutput {
        upper,
        middle,
        lower,
        width,
        percent_b,
    }
}

// =============================================================================
// ATR
// =============================================================================

/// Average True Range: simple mean of the last `period` true ranges.
///
/// Needs `period + 1` bars, else 0.
pub fn atr(bars: &Bars, period: usize) -> f64 {
    let period = period.max(1);
    if bars.len() < period + 1 {
        return 0.0;
    }
    let window = bars.tail(period + 1);
    let ranges = true_ranges(window.high, window.low, window.close);
    mean(&ranges).unwrap_or(0.0)
}

// =============================================================================
// Channels
// =============================================================================

/// Keltner channel: `EMA(ema_period) ± multiplier · ATR(atr_period)`.
pub fn keltner(bars: &Bars, ema_period: usize, atr_period: usize, multiplier: f64) -> ChannelOutput {
    if bars.is_empty() {
        return ChannelOutput::default();
    }
    let middle = ema(bars.close, ema_period);
    let band = multiplier * atr(bars, atr_period);
    ChannelOutput {
        upper: middle + band,
        middle,
        lower: middle - band,
    }
}

/// Donchian channel: highest high and lowest low of the last `period` bars
/// (fewer when the window is short).
pub fn donchian(bars: &Bars, period: usize) -> ChannelOutput {
    let window = bars.tail(period.max(1));
    match (highest(window.high), lowest(window.low)) {
        (Some(upper), Some(lower)) => ChannelOutput {
            upper,
            middle: (upper + lower) / 2.0,
            lower,
        },
        _ => ChannelOutput::default(),
    }
}

/// Price channel over the `period` bars *before* the current one.
///
/// Needs `period + 1` bars; otherwise the channel is flat at the last close.
pub fn price_channel(bars: &Bars, period: usize) -> ChannelOutput {
    let period = period.max(1);
    let Some(price) = bars.last_close() else {
        return ChannelOutput::default();
    };
    let n = bars.len();
    if n < period + 1 {
        return ChannelOutput::flat(price);
    }
    let prior_high = &bars.high[n - 1 - period..n - 1];
    let prior_low = &bars.low[n - 1 - period..n - 1];
    match (highest(prior_high), lowest(prior_low)) {
        (Some(upper), Some(lower)) => ChannelOutput {
            upper,
            middle: (upper + lower) / 2.0,
            lower,
        },
        _ => ChannelOutput::flat(price),
    }
}

// =============================================================================
// Historical volatility
// =============================================================================

/// Annualised historical volatility in percent.
///
/// Sample std dev of the last `period` log returns times √252 times 100.
/// Needs `period + 1` prices, else 0.
pub fn historical_volatility(values: &[f64], period: usize) -> f64 {
    let period = period.max(2);
    if values.len() < period + 1 {
        return 0.0;
    }
    let returns = log_returns(tail(values, period + 1));
    sample_std_dev(&returns)
        .map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
        .unwrap_or(0.0)
}
