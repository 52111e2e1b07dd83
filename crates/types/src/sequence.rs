//! Feature vectors and fixed-length sequences.

use serde::{Deserialize, Serialize};

/// One value per registered feature, in registry order, for one day index.
pub type FeatureVector = Vec<f64>;

/// Exactly `T` feature vectors ending at `end_index`, oldest first.
///
/// The length invariant is enforced by the builder that creates sequences;
/// this type only stores and reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    /// Day index of the most recent timestep.
    pub end_index: usize,
    /// Timesteps, oldest first.
    pub steps: Vec<FeatureVector>,
}

impl Sequence {
    pub fn new(end_index: usize, steps: Vec<FeatureVector>) -> Self {
        Self { end_index, steps }
    }

    /// Number of timesteps (`T`).
    #[inline]
    pub fn timesteps(&self) -> usize {
        self.steps.len()
    }

    /// Number of features per timestep (`F`), 0 for an empty sequence.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.steps.first().map_or(0, Vec::len)
    }

    /// Values of one feature through time.
    pub fn channel(&self, feature: usize) -> impl Iterator<Item = f64> + '_ {
        self.steps
            .iter()
            .map(move |step| step.get(feature).copied().unwrap_or(f64::NAN))
    }

    /// Row-major `T × F` copy of all values.
    pub fn flatten(&self) -> Vec<f64> {
        self.steps.iter().flatten().copied().collect()
    }

    /// Linear interpolation `self + lambda * (other - self)` per timestep and feature.
    ///
    /// Both sequences must share the same shape; the result keeps `self.end_index`.
    pub fn interpolate(&self, other: &Sequence, lambda: f64) -> Sequence {
        let steps = self
            .steps
            .iter()
            .zip(&other.steps)
            .map(|(a, b)| {
                a.iter()
                    .zip(b)
                    .map(|(x, y)| x + lambda * (y - x))
                    .collect()
            })
            .collect();
        Sequence::new(self.end_index, steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(values: &[[f64; 2]]) -> Sequence {
        Sequence::new(values.len() - 1, values.iter().map(|v| v.to_vec()).collect())
    }

    #[test]
    fn test_shape_and_channel() {
        let s = seq(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]);
        assert_eq!(s.timesteps(), 3);
        assert_eq!(s.n_features(), 2);
        assert_eq!(s.channel(1).collect::<Vec<_>>(), vec![10.0, 20.0, 30.0]);
        assert_eq!(s.flatten(), vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = seq(&[[0.0, 0.0], [2.0, 4.0]]);
        let b = seq(&[[2.0, 2.0], [4.0, 8.0]]);
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.steps, vec![vec![1.0, 1.0], vec![3.0, 6.0]]);
        assert_eq!(mid.end_index, a.end_index);
    }
}
