//! Feature subset selection over per-feature value columns.

use quant::stats::correlation;
use tracing::debug;
use types::FeatureSelection;

/// Ascending indices of the features to retain.
///
/// `columns[f]` holds every observed value of feature `f`.
pub fn select_features(columns: &[Vec<f64>], selection: FeatureSelection) -> Vec<usize> {
    match selection {
        FeatureSelection::All => (0..columns.len()).collect(),
        FeatureSelection::Decorrelated {
            max_features,
            max_abs_correlation,
        } => decorrelated(columns, max_features, max_abs_correlation),
    }
}

/// Greedy decorrelation in registry order.
///
/// Constant columns (every value equal) are skipped; sparse columns such as
/// pattern flags vary and stay eligible. A column is kept when its
/// absolute correlation with every kept column is at most
/// `max_abs_correlation`; a pair with undefined correlation counts as
/// uncorrelated. Stops after `max_features` columns.
fn decorrelated(columns: &[Vec<f64>], max_features: usize, max_abs_correlation: f64) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::new();
    let mut constant = 0usize;
    let mut correlated = 0usize;

    for (index, column) in columns.iter().enumerate() {
        if kept.len() >= max_features {
            break;
        }
        if is_constant(column) {
            constant += 1;
            continue;
        }
        let independent = kept.iter().all(|&other| {
            correlation(column, &columns[other])
                .is_none_or(|r| r.abs() <= max_abs_correlation)
        });
        if independent {
            kept.push(index);
        } else {
            correlated += 1;
        }
    }

    debug!(
        kept = kept.len(),
        constant, correlated, "decorrelated feature selection"
    );
    kept
}

fn is_constant(column: &[f64]) -> bool {
    column.windows(2).all(|w| w[0] == w[1])
}
