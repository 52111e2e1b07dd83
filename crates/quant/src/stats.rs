//! Statistical utilities for indicator and normalization math.
//!
//! Every function returns `None` instead of a NaN when the input cannot
//! support the statistic; callers choose their own neutral value.

use std::cmp::Ordering;

/// Calculate the mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate the variance of a slice of values (population variance).
pub fn variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean_val = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean_val).powi(2)).sum();
    Some(sum_sq / n as f64)
}

/// Calculate the standard deviation (population).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(|v| v.sqrt())
}

/// Calculate the sample variance (n-1 denominator).
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean_val = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean_val).powi(2)).sum();
    Some(sum_sq / (n - 1) as f64)
}

/// Calculate the sample standard deviation (n-1 denominator).
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(|v| v.sqrt())
}

/// Calculate log returns from a price series.
/// Returns ln(price[i] / price[i-1]) for each consecutive pair of positive prices.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return vec![];
    }

    prices
        .windows(2)
        .filter_map(|w| {
            if w[0] > 0.0 && w[1] > 0.0 {
                Some((w[1] / w[0]).ln())
            } else {
                None
            }
        })
        .collect()
}

/// Calculate covariance between two series.
pub fn covariance(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;
    let n = x.len();

    let sum: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();

    Some(sum / n as f64)
}

/// Calculate Pearson correlation coefficient.
///
/// Returns `None` when either series is constant.
pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let cov = covariance(x, y)?;
    let std_x = std_dev(x)?;
    let std_y = std_dev(y)?;

    if std_x == 0.0 || std_y == 0.0 {
        return None;
    }

    Some((cov / (std_x * std_y)).clamp(-1.0, 1.0))
}

/// Median of the values (mean of the two middle values for even lengths).
///
/// Sorts a copy with a total order, so the result does not depend on the
/// input order.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    Some(median_of_sorted(&sorted))
}

/// Median absolute deviation from the median.
pub fn median_absolute_deviation(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Index of the largest value, preferring the most recent on ties.
pub fn argmax_last(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i)
}

/// Index of the smallest value, preferring the most recent on ties.
pub fn argmin_last(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        // `max_by` keeps the last of equal elements; reversing the order
        // turns it into a last-minimum search.
        .max_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = std_dev(&values).unwrap();
        assert!((std - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_log_returns_skip_non_positive() {
        let rets = log_returns(&[100.0, 110.0, 0.0, 121.0]);
        assert_eq!(rets.len(), 1);
        assert!((rets[0] - 0.1_f64.ln_1p()).abs() < 1e-12);
    }

    #[test]
    fn test_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let corr = correlation(&x, &y).unwrap();
        assert!((corr - 1.0).abs() < 0.0001); // Perfect positive correlation
        assert!(correlation(&x, &[3.0; 5]).is_none());
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mad() {
        // median = 2, deviations = [1, 1, 0, 0, 2, 4, 7] -> median 1
        let values = [1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];
        assert_eq!(median_absolute_deviation(&values), Some(1.0));
        assert_eq!(median_absolute_deviation(&[5.0; 4]), Some(0.0));
    }

    #[test]
    fn test_arg_extremes_prefer_latest() {
        let values = [1.0, 5.0, 2.0, 5.0, 0.0, 0.0];
        assert_eq!(argmax_last(&values), Some(3));
        assert_eq!(argmin_last(&values), Some(5));
    }
}
