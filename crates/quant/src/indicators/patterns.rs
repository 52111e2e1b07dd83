//! Chart pattern detectors over closing prices.
//!
//! Detectors look for strict local extrema and test consecutive extrema
//! for similarity and spacing. Each returns `true` when any qualifying
//! arrangement exists anywhere in the window.

use smallvec::SmallVec;

/// Bars on each side an extremum must strictly dominate.
const NEIGHBORHOOD: usize = 3;
/// Minimum bars between consecutive extrema of a pattern.
const MIN_SPACING: usize = 5;
/// Relative tolerance for matching tops or bottoms.
const LEVEL_TOLERANCE: f64 = 0.05;
/// Relative tolerance between the two shoulders.
const SHOULDER_TOLERANCE: f64 = 0.10;
/// Minimum relative depth of the valley (or height of the head/peak).
const MIN_DEPTH: f64 = 0.02;

type Extrema = SmallVec<[usize; 8]>;

fn local_extrema(values: &[f64], is_peak: bool) -> Extrema {
    let mut found = Extrema::new();
    if values.len() < 2 * NEIGHBORHOOD + 1 {
        return found;
    }
    for i in NEIGHBORHOOD..values.len() - NEIGHBORHOOD {
        let center = values[i];
        let dominates = (i - NEIGHBORHOOD..=i + NEIGHBORHOOD)
            .filter(|&j| j != i)
            .all(|j| {
                if is_peak {
                    center > values[j]
                } else {
                    center < values[j]
                }
            });
        if dominates {
            found.push(i);
        }
    }
    found
}

/// Indices of strict local maxima within a ±3 bar neighbourhood.
pub fn local_maxima(values: &[f64]) -> Extrema {
    local_extrema(values, true)
}

/// Indices of strict local minima within a ±3 bar neighbourhood.
pub fn local_minima(values: &[f64]) -> Extrema {
    local_extrema(values, false)
}

#[inline]
fn within(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs());
    scale > 0.0 && (a - b).abs() / scale <= tolerance
}

#[inline]
fn spaced(indices: &[usize]) -> bool {
    indices.windows(2).all(|w| w[1] - w[0] >= MIN_SPACING)
}

fn lowest_between(values: &[f64], from: usize, to: usize) -> f64 {
    values[from..=to].iter().copied().fold(f64::INFINITY, f64::min)
}

fn highest_between(values: &[f64], from: usize, to: usize) -> f64 {
    values[from..=to]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

// =============================================================================
// Double & triple patterns
// =============================================================================

/// Two similar peaks with a valley at least 2 % below the lower peak.
pub fn double_top(values: &[f64]) -> bool {
    let peaks = local_maxima(values);
    peaks.windows(2).any(|pair| {
        let (a, b) = (values[pair[0]], values[pair[1]]);
        spaced(pair)
            && within(a, b, LEVEL_TOLERANCE)
            && lowest_between(values, pair[0], pair[1]) <= a.min(b) * (1.0 - MIN_DEPTH)
    })
}

/// Two similar troughs with a peak at least 2 % above the higher trough.
pub fn double_bottom(values: &[f64]) -> bool {
    let troughs = local_minima(values);
    troughs.windows(2).any(|pair| {
        let (a, b) = (values[pair[0]], values[pair[1]]);
        spaced(pair)
            && within(a, b, LEVEL_TOLERANCE)
            && highest_between(values, pair[0], pair[1]) >= a.max(b) * (1.0 + MIN_DEPTH)
    })
}

fn near_common_level(values: &[f64], indices: &[usize]) -> bool {
    let level = indices.iter().map(|&i| values[i]).sum::<f64>() / indices.len() as f64;
    indices
        .iter()
        .all(|&i| within(values[i], level, LEVEL_TOLERANCE))
}

/// Three peaks within 5 % of their mean.
pub fn triple_top(values: &[f64]) -> bool {
    let peaks = local_maxima(values);
    peaks
        .windows(3)
        .any(|triple| spaced(triple) && near_common_level(values, triple))
}

/// Three troughs within 5 % of their mean.
pub fn triple_bottom(values: &[f64]) -> bool {
    let troughs = local_minima(values);
    troughs
        .windows(3)
        .any(|triple| spaced(triple) && near_common_level(values, triple))
}

// =============================================================================
// Head and shoulders
// =============================================================================

/// Three consecutive peaks: shoulders within 10 % of each other and a head
/// at least 2 % above both.
pub fn head_and_shoulders(values: &[f64]) -> bool {
    let peaks = local_maxima(values);
    peaks.windows(3).any(|triple| {
        let (left, head, right) = (values[triple[0]], values[triple[1]], values[triple[2]]);
        spaced(triple)
            && within(left, right, SHOULDER_TOLERANCE)
            && head >= left.max(right) * (1.0 + MIN_DEPTH)
    })
}
