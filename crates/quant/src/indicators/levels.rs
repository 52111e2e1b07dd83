//! Support and resistance levels.

use types::{Bars, CamarillaOutput, FibonacciOutput};

use super::{highest, lowest};

/// Camarilla pivots from the previous `session` bars.
///
/// The session is the `session` bars before the current one; its close is
/// the bar just before the current bar. Levels are
/// `C ± range · 1.1 / {2, 4, 6, 12}`. Without a complete previous session
/// every level equals the last close.
pub fn camarilla(bars: &Bars, session: usize) -> CamarillaOutput {
    let session = session.max(1);
    let Some(price) = bars.last_close() else {
        return CamarillaOutput::default();
    };
    let n = bars.len();
    if n < session + 1 {
        return CamarillaOutput {
            r4: price,
            r3: price,
            r2: price,
            r1: price,
            s1: price,
            s2: price,
            s3: price,
            s4: price,
        };
    }

    let previous = n - 1 - session..n - 1;
    let high = highest(&bars.high[previous.clone()]).unwrap_or(price);
    let low = lowest(&bars.low[previous]).unwrap_or(price);
    let close = bars.close[n - 2];
    let span = (high - low) * 1.1;

    CamarillaOutput {
        r4: close + span / 2.0,
        r3: close + span / 4.0,
        r2: close + span / 6.0,
        r1: close + span / 12.0,
        s1: close - span / 12.0,
        s2: close - span / 6.0,
        s3: close - span / 4.0,
        s4: close - span / 2.0,
    }
}

/// Fibonacci retracement of the swing over the last `period` bars.
///
/// Each level is `high − ratio · (high − low)`.
pub fn fibonacci(bars: &Bars, period: usize) -> FibonacciOutput {
    let window = bars.tail(period.max(1));
    let (Some(swing_high), Some(swing_low)) = (highest(window.high), lowest(window.low)) else {
        return FibonacciOutput::default();
    };
    let span = swing_high - swing_low;
    let level = |ratio: f64| swing_high - ratio * span;

    FibonacciOutput {
        swing_high,
        swing_low,
        level_236: level(0.236),
        level_382: level(0.382),
        level_500: level(0.5),
        level_618: level(0.618),
    }
}
