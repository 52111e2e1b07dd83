//! Declarative parallel/sequential execution utilities.
//!
//! Pipeline stages are pure functions over independent day indices or
//! samples. These helpers apply such a function over a collection using
//! rayon when the `parallel` feature is enabled and plain iterators
//! otherwise, so the `cfg` logic lives in one place.
//!
//! # Runtime Override
//!
//! Every helper accepts `force_sequential`. When `true`, execution is
//! sequential even with the `parallel` feature enabled. Results are always
//! returned in input order, so the two modes produce identical output.
//!
//! # Example
//!
//! ```
//! let squares = parallel::map_slice(&[1, 2, 3], |x| x * x, false);
//! assert_eq!(squares, vec![1, 4, 9]);
//!
//! let evens = parallel::filter_map_range(0..6, |i| (i % 2 == 0).then_some(i), true);
//! assert_eq!(evens, vec![0, 2, 4]);
//! ```

use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// True when the `parallel` feature is compiled in.
pub const fn is_parallel_enabled() -> bool {
    cfg!(feature = "parallel")
}

// =============================================================================
// Slice Operations
// =============================================================================

/// Map a function over a slice, potentially in parallel.
///
/// Returns results in the same order as the input.
#[inline]
pub fn map_slice<T, F, R>(slice: &[T], f: F, force_sequential: bool) -> Vec<R>
where
    T: Sync,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(f).collect()
        } else {
            slice.par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(f).collect()
    }
}

// =============================================================================
// Index-range Operations
// =============================================================================

/// Map over a range of indices, potentially in parallel.
#[inline]
pub fn map_range<F, R>(range: Range<usize>, f: F, force_sequential: bool) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            range.map(f).collect()
        } else {
            range.into_par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        range.map(f).collect()
    }
}

/// Filter-map over a range of indices, potentially in parallel.
#[inline]
pub fn filter_map_range<F, R>(range: Range<usize>, f: F, force_sequential: bool) -> Vec<R>
where
    F: Fn(usize) -> Option<R> + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            range.filter_map(f).collect()
        } else {
            range.into_par_iter().filter_map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        range.filter_map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_slice_preserves_order() {
        let input: Vec<u64> = (0..1_000).collect();
        let parallel = map_slice(&input, |x| x * 3, false);
        let sequential = map_slice(&input, |x| x * 3, true);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[999], 2_997);
    }

    #[test]
    fn test_range_helpers_match_sequential() {
        let f = |i: usize| (i % 7 != 0).then_some(i * i);
        assert_eq!(
            filter_map_range(0..500, f, false),
            filter_map_range(0..500, f, true)
        );
        assert_eq!(map_range(3..6, |i| i + 1, false), vec![4, 5, 6]);
        assert!(map_range(5..5, |i| i, false).is_empty());
    }
}
