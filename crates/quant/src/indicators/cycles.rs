//! Cycle indicators.

use std::f64::consts::{FRAC_PI_4, TAU};

use types::SineWaveOutput;

use super::tail;

/// MESA-style sine wave of the dominant cycle.
///
/// The last `period` prices are detrended with a least-squares line, and the
/// phase of the cycle with length `period` is read from a single DFT bin.
/// Returns `sin(phase)` and the 45° lead `sin(phase + π/4)`. Fewer than
/// `period` prices, or no cyclic energy at all, give zeros.
pub fn mesa_sine_wave(values: &[f64], period: usize) -> SineWaveOutput {
    let period = period.max(4);
    if values.len() < period {
        return SineWaveOutput::default();
    }
    let window = tail(values, period);
    let n = window.len() as f64;

    // Least-squares line through (k, x_k).
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = window.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (k, y) in window.iter().enumerate() {
        let dx = k as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };

    let (mut real, mut imag) = (0.0, 0.0);
    for (k, y) in window.iter().enumerate() {
        let detrended = y - (y_mean + slope * (k as f64 - x_mean));
        let angle = TAU * k as f64 / n;
        real += detrended * angle.cos();
        imag += detrended * angle.sin();
    }

    let energy = real.hypot(imag);
    if energy <= 1e-12 * y_mean.abs().max(1.0) {
        return SineWaveOutput::default();
    }

    // x_k ≈ A·cos(2πk/n − φ); the current bar is k = n − 1.
    let phase = TAU * (n - 1.0) / n - imag.atan2(real);
    SineWaveOutput {
        sine: phase.sin(),
        lead_sine: (phase + FRAC_PI_4).sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_cycle_phase() {
        let period = 20;
        let n = period as f64;
        let center = (n - 1.0) / 2.0;
        // Cosine peaking mid-window is symmetric, so detrending leaves it intact
        // and the current bar sits half a window (minus half a bar) past the peak.
        let values: Vec<f64> = (0..period)
            .map(|k| 100.0 + (TAU * (k as f64 - center) / n).cos())
            .collect();
        let expected = std::f64::consts::PI * (n - 1.0) / n;
        let out = mesa_sine_wave(&values, period);
        assert!((out.sine - expected.sin()).abs() < 1e-9);
        assert!((out.lead_sine - (expected + FRAC_PI_4).sin()).abs() < 1e-9);
    }

    #[test]
    fn test_trend_only_has_no_cycle() {
        let values: Vec<f64> = (0..30).map(|i| 50.0 + 2.0 * i as f64).collect();
        assert_eq!(mesa_sine_wave(&values, 20), SineWaveOutput::default());
        assert_eq!(mesa_sine_wave(&values[..5], 20), SineWaveOutput::default());
    }

    #[test]
    fn test_outputs_bounded() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.37).sin() * 3.0).collect();
        let out = mesa_sine_wave(&values, 20);
        assert!((-1.0..=1.0).contains(&out.sine));
        assert!((-1.0..=1.0).contains(&out.lead_sine));
    }
}
