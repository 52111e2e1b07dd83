//! Brute-force k-nearest-neighbour index over flattened sequences.

use types::Sequence;

/// Exact k-NN over fixed-length points with Euclidean distance.
///
/// Built once per balancing call. Ties are broken by the lower index, so
/// results are fully deterministic.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    points: Vec<Vec<f64>>,
}

impl NeighborIndex {
    pub fn new(points: Vec<Vec<f64>>) -> Self {
        Self { points }
    }

    /// Index the row-major flattening of each sequence.
    pub fn from_sequences<'a>(sequences: impl IntoIterator<Item = &'a Sequence>) -> Self {
        Self::new(sequences.into_iter().map(Sequence::flatten).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The `k` points nearest to point `query`, excluding itself, nearest first.
    pub fn nearest(&self, query: usize, k: usize) -> Vec<usize> {
        let Some(origin) = self.points.get(query) else {
            return Vec::new();
        };
        let mut candidates: Vec<(f64, usize)> = self
            .points
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != query)
            .map(|(i, p)| (squared_distance(origin, p), i))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        candidates.truncate(k);
        candidates.into_iter().map(|(_, i)| i).collect()
    }

    /// Neighbour lists for every point.
    pub fn all_nearest(&self, k: usize, force_sequential: bool) -> Vec<Vec<usize>> {
        parallel::map_range(0..self.len(), |i| self.nearest(i, k), force_sequential)
    }
}

#[inline]
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> NeighborIndex {
        NeighborIndex::new(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![5.0, 5.0],
        ])
    }

    #[test]
    fn test_nearest_excludes_self_and_breaks_ties_by_index() {
        let idx = index();
        assert_eq!(idx.nearest(0, 2), vec![1, 2]);
        assert_eq!(idx.nearest(3, 1), vec![1]);
        assert_eq!(idx.nearest(0, 10).len(), 3);
        assert!(idx.nearest(9, 2).is_empty());
    }

    #[test]
    fn test_all_nearest_matches_single_queries() {
        let idx = index();
        let all = idx.all_nearest(2, false);
        assert_eq!(all.len(), 4);
        for (i, list) in all.iter().enumerate() {
            assert_eq!(list, &idx.nearest(i, 2));
        }
    }

    #[test]
    fn test_from_sequences_flattens() {
        let a = Sequence::new(0, vec![vec![0.0], vec![0.0]]);
        let b = Sequence::new(1, vec![vec![3.0], vec![4.0]]);
        let idx = NeighborIndex::from_sequences([&a, &b]);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.nearest(1, 1), vec![0]);
    }
}
