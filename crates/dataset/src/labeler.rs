//! Forward-return labeling.
//!
//! A day is a `Buy` when the return `horizon` days ahead strictly exceeds
//! the threshold; everything else (falling, flat, small gains, or no
//! forward data) is a `Sell`. The one-sided rule is deliberate and must not
//! be made symmetric.

use types::{Label, LabelConfig};

/// Fractional return from `day_index` to `day_index + horizon`.
///
/// `None` when the horizon runs past the end of the series or the current
/// price is 0.
#[inline]
pub fn forward_return(prices: &[f64], day_index: usize, horizon: usize) -> Option<f64> {
    let future = prices.get(day_index.checked_add(horizon)?)?;
    let current = prices[day_index];
    if current == 0.0 {
        return None;
    }
    Some((future - current) / current)
}

/// Label one day.
pub fn label(prices: &[f64], day_index: usize, config: &LabelConfig) -> Label {
    match forward_return(prices, day_index, config.horizon) {
        Some(pct) if pct > config.threshold => Label::Buy,
        _ => Label::Sell,
    }
}

/// Label several days.
pub fn label_all(prices: &[f64], indices: &[usize], config: &LabelConfig) -> Vec<Label> {
    indices
        .iter()
        .map(|&day| label(prices, day, config))
        .collect()
}
