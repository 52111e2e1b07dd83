//! Canonical feature registry.
//!
//! The registry is the single source of truth for feature order. Every
//! descriptor is registered explicitly, in order, by
//! [`FeatureRegistry::standard`]; nothing is discovered at runtime.
//!
//! # Order Is A Contract
//!
//! Normalization statistics and trained models index features by position.
//! Reordering, inserting or removing a descriptor is a breaking schema
//! change and alters [`FeatureRegistry::fingerprint`]. Append new features at
//! the end.

use std::collections::HashSet;
use std::fmt;

use quant::indicators::{
    cycles, levels, momentum, moving_average as ma, patterns, trend, volatility, volume,
};
use types::Bars;

use crate::error::FeatureError;

// =============================================================================
// Descriptor
// =============================================================================

/// Indicator family a feature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureCategory {
    Price,
    MovingAverage,
    Momentum,
    Trend,
    Volatility,
    Volume,
    Cycle,
    Level,
    Pattern,
}

impl FeatureCategory {
    pub fn name(self) -> &'static str {
        match self {
            FeatureCategory::Price => "price",
            FeatureCategory::MovingAverage => "moving_average",
            FeatureCategory::Momentum => "momentum",
            FeatureCategory::Trend => "trend",
            FeatureCategory::Volatility => "volatility",
            FeatureCategory::Volume => "volume",
            FeatureCategory::Cycle => "cycle",
            FeatureCategory::Level => "level",
            FeatureCategory::Pattern => "pattern",
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signature every feature computes with: the trailing window, newest last.
pub type ComputeFn = fn(&Bars) -> f64;

/// One named feature: how much history it reads and how it is computed.
#[derive(Clone, Copy)]
pub struct FeatureDescriptor {
    pub name: &'static str,
    pub category: FeatureCategory,
    /// Bars of history (including the current day) passed to `compute`.
    pub lookback: usize,
    compute: ComputeFn,
}

impl FeatureDescriptor {
    pub fn new(
        name: &'static str,
        category: FeatureCategory,
        lookback: usize,
        compute: ComputeFn,
    ) -> Self {
        Self {
            name,
            category,
            lookback: lookback.max(1),
            compute,
        }
    }

    /// Evaluate the feature on a trailing window.
    #[inline]
    pub fn compute(&self, bars: &Bars) -> f64 {
        (self.compute)(bars)
    }
}

impl fmt::Debug for FeatureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("lookback", &self.lookback)
            .finish()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Ordered list of feature descriptors.
#[derive(Debug, Clone)]
pub struct FeatureRegistry {
    descriptors: Vec<FeatureDescriptor>,
}

impl FeatureRegistry {
    /// Build a registry from descriptors in the given order.
    pub fn from_descriptors(descriptors: Vec<FeatureDescriptor>) -> Result<Self, FeatureError> {
        let mut seen = HashSet::with_capacity(descriptors.len());
        if let Some(dup) = descriptors.iter().find(|d| !seen.insert(d.name)) {
            return Err(FeatureError::DuplicateName(dup.name));
        }
        Ok(Self { descriptors })
    }

    /// The canonical feature set. Feature 0 is the close price.
    pub fn standard() -> Self {
        Self {
            descriptors: standard_descriptors(),
        }
    }

    /// Number of features per vector.
    #[inline]
    pub fn feature_count(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn descriptors(&self) -> &[FeatureDescriptor] {
        &self.descriptors
    }

    /// Feature names in registry order.
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.name).collect()
    }

    /// Position of a feature by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.name == name)
    }

    /// Longest history any feature reads.
    pub fn lookback(&self) -> usize {
        self.descriptors
            .iter()
            .map(|d| d.lookback)
            .max()
            .unwrap_or(1)
    }

    /// Descriptors of one family, in registry order.
    pub fn by_category(
        &self,
        category: FeatureCategory,
    ) -> impl Iterator<Item = &FeatureDescriptor> + '_ {
        self.descriptors
            .iter()
            .filter(move |d| d.category == category)
    }

    /// Stable 64-bit FNV-1a hash of the ordered feature names.
    ///
    /// Stamped on artifacts so a consumer can detect a registry change
    /// without comparing every name.
    pub fn fingerprint(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        self.descriptors
            .iter()
            .flat_map(|d| d.name.bytes().chain(std::iter::once(0)))
            .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
    }
}

/// Feature count of a registry, resolved once at startup and stored in
/// the pipeline configuration.
pub fn detect_feature_count(registry: &FeatureRegistry) -> usize {
    registry.feature_count()
}

// =============================================================================
// Standard feature set
// =============================================================================

#[inline]
fn last(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(0.0)
}

#[inline]
fn flag(detected: bool) -> f64 {
    if detected { 1.0 } else { 0.0 }
}

fn standard_descriptors() -> Vec<FeatureDescriptor> {
    use FeatureCategory::*;
    let d = FeatureDescriptor::new;

    vec![
        // ─────────────────────────────────────────────────────────────────────
        // Price & volume (f_price must stay at index 0)
        // ─────────────────────────────────────────────────────────────────────
        d("f_price", Price, 1, |b| last(b.close)),
        d("f_volume", Volume, 1, |b| last(b.volume)),
        d("f_return_1", Price, 2, |b| match b.close {
            [.., prev, cur] if *prev != 0.0 => cur / prev - 1.0,
            _ => 0.0,
        }),
        // ─────────────────────────────────────────────────────────────────────
        // Moving averages
        // ─────────────────────────────────────────────────────────────────────
        d("f_sma_20", MovingAverage, 20, |b| ma::sma(b.close, 20)),
        d("f_sma_50", MovingAverage, 50, |b| ma::sma(b.close, 50)),
        d("f_sma_200", MovingAverage, 200, |b| ma::sma(b.close, 200)),
        d("f_ema_12", MovingAverage, 60, |b| ma::ema(b.close, 12)),
        d("f_ema_26", MovingAverage, 120, |b| ma::ema(b.close, 26)),
        d("f_hull_ma_20", MovingAverage, 40, |b| ma::hull_ma(b.close, 20)),
        d("f_kama_10", MovingAverage, 60, |b| ma::kama(b.close, 10, 2, 30)),
        d("f_rainbow_ma", MovingAverage, 30, |b| ma::rainbow_ma(b.close, 10, 2)),
        // ─────────────────────────────────────────────────────────────────────
        // Momentum
        // ─────────────────────────────────────────────────────────────────────
        d("f_rsi_14", Momentum, 100, |b| momentum::rsi(b.close, 14)),
        d("f_stoch_rsi", Momentum, 100, |b| momentum::stoch_rsi(b.close, 14, 14)),
        d("f_williams_r", Momentum, 14, |b| momentum::williams_r(b, 14)),
        d("f_cci_20", Momentum, 20, |b| momentum::cci(b, 20)),
        d("f_mfi_14", Momentum, 15, |b| momentum::mfi(b, 14)),
        d("f_tsi", Momentum, 100, |b| momentum::tsi(b.close, 25, 13)),
        d("f_pmo", Momentum, 100, |b| momentum::pmo(b.close, 35, 20)),
        d("f_fisher", Momentum, 50, |b| momentum::fisher_transform(b, 10)),
        d("f_accelerator", Momentum, 60, momentum::accelerator_oscillator),
        d("f_macd_line", Momentum, 120, |b| {
            momentum::macd(b.close, 12, 26, 9).macd_line
        }),
        d("f_macd_signal", Momentum, 120, |b| {
            momentum::macd(b.close, 12, 26, 9).signal_line
        }),
        d("f_macd_hist", Momentum, 120, |b| {
            momentum::macd(b.close, 12, 26, 9).histogram
        }),
        // ─────────────────────────────────────────────────────────────────────
        // Trend
        // ─────────────────────────────────────────────────────────────────────
        d("f_adx_14", Trend, 100, |b| trend::adx(b, 14).adx),
        d("f_plus_di", Trend, 100, |b| trend::adx(b, 14).plus_di),
        d("f_minus_di", Trend, 100, |b| trend::adx(b, 14).minus_di),
        d("f_aroon_up", Trend, 26, |b| trend::aroon(b, 25).up),
        d("f_aroon_down", Trend, 26, |b| trend::aroon(b, 25).down),
        d("f_psar", Trend, 100, |b| trend::parabolic_sar(b, 0.02, 0.2)),
        d("f_ichimoku_tenkan", Trend, 9, |b| trend::ichimoku(b).tenkan),
        d("f_ichimoku_kijun", Trend, 26, |b| trend::ichimoku(b).kijun),
        d("f_ichimoku_cloud", Trend, 78, |b| trend::ichimoku(b).cloud_position),
        d("f_mass_index", Trend, 60, |b| trend::mass_index(b, 9, 25)),
        // ─────────────────────────────────────────────────────────────────────
        // Volatility & channels
        // ─────────────────────────────────────────────────────────────────────
        d("f_bb_upper", Volatility, 20, |b| volatility::bollinger(b.close, 20, 2.0).upper),
        d("f_bb_lower", Volatility, 20, |b| volatility::bollinger(b.close, 20, 2.0).lower),
        d("f_bb_width", Volatility, 20, |b| volatility::bollinger(b.close, 20, 2.0).width),
        d("f_bb_percent_b", Volatility, 20, |b| {
            volatility::bollinger(b.close, 20, 2.0).percent_b
        }),
        d("f_atr_14", Volatility, 15, |b| volatility::atr(b, 14)),
        d("f_keltner_upper", Volatility, 60, |b| {
            volatility::keltner(b, 20, 10, 2.0).upper
        }),
        d("f_keltner_lower", Volatility, 60, |b| {
            volatility::keltner(b, 20, 10, 2.0).lower
        }),
        d("f_donchian_upper", Volatility, 20, |b| volatility::donchian(b, 20).upper),
        d("f_donchian_lower", Volatility, 20, |b| volatility::donchian(b, 20).lower),
        d("f_price_channel_pos", Volatility, 21, |b| {
            volatility::price_channel(b, 20).position(last(b.close))
        }),
        d("f_hist_volatility", Volatility, 21, |b| {
            volatility::historical_volatility(b.close, 20)
        }),
        // ─────────────────────────────────────────────────────────────────────
        // Volume
        // ─────────────────────────────────────────────────────────────────────
        d("f_vwap", Volume, 20, |b| volume::vwap(b, 20)),
        d("f_vwma", Volume, 20, |b| volume::vwma(b.close, b.volume, 20)),
        d("f_vpt", Volume, 50, |b| volume::vpt(b.close, b.volume)),
        d("f_cmf", Volume, 20, |b| volume::cmf(b, 20)),
        d("f_chaikin_osc", Volume, 60, |b| volume::chaikin_oscillator(b, 3, 10)),
        d("f_force_index", Volume, 60, |b| {
            volume::elder_force_index(b.close, b.volume, 13)
        }),
        d("f_klinger", Volume, 120, |b| volume::klinger(b, 34, 55)),
        // ─────────────────────────────────────────────────────────────────────
        // Cycles & levels
        // ─────────────────────────────────────────────────────────────────────
        d("f_mesa_sine", Cycle, 20, |b| cycles::mesa_sine_wave(b.close, 20).sine),
        d("f_mesa_lead", Cycle, 20, |b| cycles::mesa_sine_wave(b.close, 20).lead_sine),
        d("f_camarilla_r3", Level, 6, |b| levels::camarilla(b, 5).r3),
        d("f_camarilla_s3", Level, 6, |b| levels::camarilla(b, 5).s3),
        d("f_fib_382", Level, 50, |b| levels::fibonacci(b, 50).level_382),
        d("f_fib_618", Level, 50, |b| levels::fibonacci(b, 50).level_618),
        // ─────────────────────────────────────────────────────────────────────
        // Patterns (1.0 detected, 0.0 not)
        // ─────────────────────────────────────────────────────────────────────
        d("f_double_top", Pattern, 60, |b| flag(patterns::double_top(b.close))),
        d("f_double_bottom", Pattern, 60, |b| flag(patterns::double_bottom(b.close))),
        d("f_triple_top", Pattern, 60, |b| flag(patterns::triple_top(b.close))),
        d("f_triple_bottom", Pattern, 60, |b| flag(patterns::triple_bottom(b.close))),
        d("f_head_shoulders", Pattern, 60, |b| {
            flag(patterns::head_and_shoulders(b.close))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_shape() {
        let registry = FeatureRegistry::standard();
        assert_eq!(registry.feature_count(), 62);
        assert_eq!(detect_feature_count(&registry), registry.feature_count());
        assert_eq!(registry.names()[0], "f_price");
        assert_eq!(registry.lookback(), 200);
    }

    #[test]
    fn test_names_unique_and_prefixed() {
        let registry = FeatureRegistry::standard();
        let names = registry.names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(names.iter().all(|n| n.starts_with("f_")));
        assert!(FeatureRegistry::from_descriptors(registry.descriptors().to_vec()).is_ok());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let d = FeatureDescriptor::new("f_x", FeatureCategory::Price, 1, |b| last(b.close));
        assert_eq!(
            FeatureRegistry::from_descriptors(vec![d, d]).unwrap_err(),
            FeatureError::DuplicateName("f_x")
        );
    }

    #[test]
    fn test_fingerprint_tracks_order() {
        let registry = FeatureRegistry::standard();
        assert_eq!(registry.fingerprint(), FeatureRegistry::standard().fingerprint());

        let mut swapped = registry.descriptors().to_vec();
        swapped.swap(1, 2);
        let swapped = FeatureRegistry::from_descriptors(swapped).unwrap();
        assert_ne!(registry.fingerprint(), swapped.fingerprint());
    }

    #[test]
    fn test_index_and_category_lookup() {
        let registry = FeatureRegistry::standard();
        assert_eq!(registry.index_of("f_price"), Some(0));
        assert_eq!(registry.index_of("f_missing"), None);
        assert_eq!(registry.by_category(FeatureCategory::Pattern).count(), 5);
    }
}
