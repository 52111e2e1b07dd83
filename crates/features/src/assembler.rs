//! Per-day feature vector assembly.

use types::{FeatureVector, MarketSeries};

use crate::error::FeatureError;
use crate::registry::FeatureRegistry;

/// Builds one [`FeatureVector`] per day by evaluating every registered
/// descriptor, in registry order, on its trailing window.
///
/// Holds no mutable state: assembling the same day twice yields identical
/// vectors, and one assembler can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler<'r> {
    registry: &'r FeatureRegistry,
}

impl<'r> FeatureAssembler<'r> {
    pub fn new(registry: &'r FeatureRegistry) -> Self {
        Self { registry }
    }

    #[inline]
    pub fn registry(&self) -> &'r FeatureRegistry {
        self.registry
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.registry.feature_count()
    }

    /// Assemble the feature vector for `day_index`.
    ///
    /// Fails on an index past the series or on the first non-finite feature;
    /// the caller skips that day.
    pub fn assemble(
        &self,
        series: &MarketSeries,
        day_index: usize,
    ) -> Result<FeatureVector, FeatureError> {
        if day_index >= series.len() {
            return Err(FeatureError::IndexOutOfRange {
                index: day_index,
                len: series.len(),
            });
        }

        let mut vector = Vec::with_capacity(self.feature_count());
        for descriptor in self.registry.descriptors() {
            let bars = series
                .window(day_index, descriptor.lookback)
                .ok_or(FeatureError::IndexOutOfRange {
                    index: day_index,
                    len: series.len(),
                })?;
            let value = descriptor.compute(&bars);
            if !value.is_finite() {
                return Err(FeatureError::NonFinite {
                    day_index,
                    feature: descriptor.name,
                    value,
                });
            }
            vector.push(value);
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FeatureCategory, FeatureDescriptor};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn synthetic_series(seed: u64, n: usize) -> MarketSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut price = 100.0;
        let mut prices = Vec::with_capacity(n);
        let mut volumes = Vec::with_capacity(n);
        for _ in 0..n {
            price *= 1.0 + rng.random_range(-0.02..0.02);
            prices.push(price);
            volumes.push(rng.random_range(1_000.0..5_000.0));
        }
        MarketSeries::new(prices, volumes).unwrap()
    }

    #[test]
    fn test_every_day_has_full_finite_vector() {
        let registry = FeatureRegistry::standard();
        let assembler = FeatureAssembler::new(&registry);
        let series = synthetic_series(7, 260);

        for day in 0..series.len() {
            let vector = assembler.assemble(&series, day).unwrap();
            assert_eq!(vector.len(), registry.feature_count());
            assert!(vector.iter().all(|v| v.is_finite()), "day {day}");
            assert_eq!(vector[0], series.prices()[day]);
        }
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let registry = FeatureRegistry::standard();
        let assembler = FeatureAssembler::new(&registry);
        let series = synthetic_series(11, 240);
        let first = assembler.assemble(&series, 230).unwrap();
        let second = assembler.assemble(&series, 230).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_flat_series_is_finite() {
        let registry = FeatureRegistry::standard();
        let assembler = FeatureAssembler::new(&registry);
        let series = MarketSeries::new(vec![50.0; 220], vec![0.0; 220]).unwrap();
        let vector = assembler.assemble(&series, 219).unwrap();
        assert!(vector.iter().all(|v| v.is_finite()));
        let rsi = registry.index_of("f_rsi_14").unwrap();
        assert_eq!(vector[rsi], 100.0);
    }

    #[test]
    fn test_out_of_range_index() {
        let registry = FeatureRegistry::standard();
        let series = synthetic_series(1, 10);
        assert_eq!(
            FeatureAssembler::new(&registry).assemble(&series, 10),
            Err(FeatureError::IndexOutOfRange { index: 10, len: 10 })
        );
    }

    #[test]
    fn test_non_finite_feature_rejected() {
        let registry = FeatureRegistry::from_descriptors(vec![
            FeatureDescriptor::new("f_price", FeatureCategory::Price, 1, |b| {
                b.close.last().copied().unwrap_or(0.0)
            }),
            FeatureDescriptor::new("f_log_price", FeatureCategory::Price, 1, |b| {
                b.close.last().copied().unwrap_or(0.0).ln()
            }),
        ])
        .unwrap();
        let series = MarketSeries::new(vec![1.0, 0.0, 2.0], vec![1.0; 3]).unwrap();
        let assembler = FeatureAssembler::new(&registry);

        assert!(assembler.assemble(&series, 0).is_ok());
        assert!(matches!(
            assembler.assemble(&series, 1),
            Err(FeatureError::NonFinite {
                day_index: 1,
                feature: "f_log_price",
                ..
            })
        ));
    }
}
