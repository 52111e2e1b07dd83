//! Multi-value indicator outputs.
//!
//! Indicators that produce more than one number return one of these structs;
//! the feature registry picks the components it needs.

use serde::{Deserialize, Serialize};

// =============================================================================
// Trend & Momentum
// =============================================================================

/// MACD output values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA).
    pub macd_line: f64,
    /// Signal line (EMA of MACD line).
    pub signal_line: f64,
    /// Histogram (MACD - Signal).
    pub histogram: f64,
}

/// Average Directional Index with its directional indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AdxOutput {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

/// Aroon up/down lines (0-100) and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AroonOutput {
    pub up: f64,
    pub down: f64,
    pub oscillator: f64,
}

impl Default for AroonOutput {
    fn default() -> Self {
        Self {
            up: 50.0,
            down: 50.0,
            oscillator: 0.0,
        }
    }
}

/// Ichimoku Kinko Hyo lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct IchimokuOutput {
    /// Conversion line: midpoint of the 9-bar range.
    pub tenkan: f64,
    /// Base line: midpoint of the 26-bar range.
    pub kijun: f64,
    /// Leading span A as currently plotted (computed 26 bars ago).
    pub senkou_a: f64,
    /// Leading span B as currently plotted (computed 26 bars ago).
    pub senkou_b: f64,
    /// +1 above the cloud, -1 below, 0 inside.
    pub cloud_position: f64,
}

// =============================================================================
// Volatility & Channels
// =============================================================================

/// Bollinger Bands output values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BollingerOutput {
    /// Upper band.
    pub upper: f64,
    /// Middle band (SMA).
    pub middle: f64,
    /// Lower band.
    pub lower: f64,
    /// Band width as percentage of middle.
    pub width: f64,
    /// %B: where price is relative to bands (0 = lower, 1 = upper).
    pub percent_b: f64,
}

/// Upper/middle/lower envelope shared by Donchian, Keltner and price channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ChannelOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl ChannelOutput {
    /// Flat channel collapsed onto one price.
    pub fn flat(price: f64) -> Self {
        Self {
            upper: price,
            middle: price,
            lower: price,
        }
    }

    /// Position of `price` inside the channel on a 0-100 scale (50 when flat).
    pub fn position(&self, price: f64) -> f64 {
        let range = self.upper - self.lower;
        if range > 0.0 {
            (price - self.lower) / range * 100.0
        } else {
            50.0
        }
    }
}

// =============================================================================
// Cycles & Levels
// =============================================================================

/// MESA sine wave pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SineWaveOutput {
    pub sine: f64,
    /// Sine advanced by 45 degrees.
    pub lead_sine: f64,
}

/// Camarilla pivot levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CamarillaOutput {
    pub r4: f64,
    pub r3: f64,
    pub r2: f64,
    pub r1: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
}

/// Fibonacci retracement levels of the trailing swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FibonacciOutput {
    pub swing_high: f64,
    pub swing_low: f64,
    pub level_236: f64,
    pub level_382: f64,
    pub level_500: f64,
    pub level_618: f64,
}
