//! Difficulty-based curriculum filtering.
//!
//! Difficulty is measured on the price channel (feature 0): total absolute
//! movement plus a penalty for direction reversals, normalized by length.
//! Calm, trending sequences score low and choppy ones high.

use types::{Dataset, Sample, Sequence};

/// Fewest samples a filtered dataset keeps (unless the input is smaller).
pub const MIN_CURRICULUM_SAMPLES: usize = 50;

/// Weight of the reversal rate relative to absolute movement.
const REVERSAL_WEIGHT: f64 = 10.0;

/// Difficulty score of one sequence.
///
/// `(Σ|Δp| + 10 · reversals / (T − 2)) / T` where `p` is feature 0 and a
/// reversal is a strict sign change between consecutive differences. The
/// reversal term needs at least three timesteps.
pub fn difficulty(sequence: &Sequence) -> f64 {
    let t = sequence.timesteps();
    if t == 0 {
        return 0.0;
    }
    let prices: Vec<f64> = sequence.channel(0).collect();
    let diffs: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    let movement: f64 = diffs.iter().map(|d| d.abs()).sum();
    let reversal_term = if t >= 3 {
        let reversals = diffs.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
        REVERSAL_WEIGHT * reversals as f64 / (t - 2) as f64
    } else {
        0.0
    };
    (movement + reversal_term) / t as f64
}

/// Keep the easiest fraction of the dataset.
///
/// A level of 1.0 or more, or a non-finite level, returns the dataset
/// unchanged. Lower levels are clamped to `[0.1, 1.0]`; the `max(50, floor(N · level))` lowest-difficulty
/// samples are kept, easiest first, with their `difficulty` recorded.
pub fn filter(dataset: &Dataset, level: f64) -> Dataset {
    if !level.is_finite() || level >= 1.0 {
        return dataset.clone();
    }
    let level = level.clamp(0.1, 1.0);
    let n = dataset.len();
    let keep = n.min(MIN_CURRICULUM_SAMPLES.max((n as f64 * level).floor() as usize));

    let mut scored: Vec<Sample> = dataset
        .iter()
        .map(|s| {
            let mut sample = s.clone();
            sample.difficulty = Some(difficulty(&s.sequence));
            sample
        })
        .collect();
    scored.sort_by(|a, b| {
        a.difficulty
            .unwrap_or(0.0)
            .total_cmp(&b.difficulty.unwrap_or(0.0))
    });
    scored.truncate(keep);
    Dataset::new(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Label;

    fn seq_from_prices(end: usize, prices: &[f64]) -> Sequence {
        Sequence::new(end, prices.iter().map(|&p| vec![p, 1.0]).collect())
    }

    #[test]
    fn test_difficulty_trend_vs_chop() {
        let trend = seq_from_prices(0, &[1.0, 2.0, 3.0, 4.0]);
        // Σ|Δ| = 3, no reversals, T = 4.
        assert!((difficulty(&trend) - 0.75).abs() < 1e-12);

        let chop = seq_from_prices(0, &[1.0, 2.0, 1.0, 2.0]);
        // Σ|Δ| = 3, 2 reversals over T - 2 = 2 → 10.
        assert!((difficulty(&chop) - 13.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_difficulty_short_sequences() {
        assert_eq!(difficulty(&Sequence::new(0, vec![])), 0.0);
        let two = seq_from_prices(0, &[1.0, 3.0]);
        assert!((difficulty(&two) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_steps_are_not_reversals() {
        let s = seq_from_prices(0, &[1.0, 2.0, 2.0, 1.0]);
        assert!((difficulty(&s) - 0.5).abs() < 1e-12);
    }

    fn graded(n: usize) -> Dataset {
        // Sample i has slope n - i, so later samples are easier.
        (0..n)
            .map(|i| {
                let slope = (n - i) as f64;
                let label = if i % 2 == 0 { Label::Buy } else { Label::Sell };
                Sample::new(seq_from_prices(i, &[0.0, slope, 2.0 * slope]), label)
            })
            .collect()
    }

    #[test]
    fn test_full_level_is_identity() {
        let ds = graded(80);
        assert_eq!(filter(&ds, 1.0), ds);
        assert_eq!(filter(&ds, f64::NAN), ds);
        assert_eq!(filter(&ds, f64::NEG_INFINITY), ds);
    }

    #[test]
    fn test_half_level_keeps_easiest_half() {
        let ds = graded(200);
        let out = filter(&ds, 0.5);
        assert_eq!(out.len(), 100);

        let mut kept: Vec<usize> = out.iter().map(|s| s.sequence.end_index).collect();
        kept.sort_unstable();
        assert_eq!(kept, (100..200).collect::<Vec<_>>());

        let scores: Vec<f64> = out.iter().filter_map(|s| s.difficulty).collect();
        assert_eq!(scores.len(), 100);
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_minimum_sample_floor() {
        let ds = graded(120);
        assert_eq!(filter(&ds, 0.1).len(), MIN_CURRICULUM_SAMPLES);
        assert_eq!(filter(&graded(30), 0.2).len(), 30);
        // Levels below the floor are clamped to 0.1.
        assert_eq!(filter(&graded(1_000), 0.01).len(), 100);
    }
}
