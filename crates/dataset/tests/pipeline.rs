//! End-to-end pipeline runs over a seeded random walk.

use dataset::{DatasetPipeline, MIN_CURRICULUM_SAMPLES, label};
use features::FeatureRegistry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use types::{
    BalancingStrategy, FeatureSelection, MarketSeries, NormalizationStats, PipelineConfig,
    StatsMethod,
};

fn random_walk_series(seed: u64, n: usize) -> MarketSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 120.0;
    let mut prices = Vec::with_capacity(n);
    let mut volumes = Vec::with_capacity(n);
    for _ in 0..n {
        price *= 1.0 + rng.random_range(-0.02..0.021);
        prices.push(price);
        volumes.push(rng.random_range(5_000.0..20_000.0));
    }
    MarketSeries::new(prices, volumes).unwrap()
}

fn config() -> PipelineConfig {
    PipelineConfig::default().with_timesteps(20)
}

#[test]
fn test_unbalanced_run_shapes_and_labels() {
    let series = random_walk_series(7, 600);
    let config = config().with_balancing(BalancingStrategy::None);
    let pipeline = DatasetPipeline::new(FeatureRegistry::standard(), config).unwrap();
    let output = pipeline.run(&series);

    let f = pipeline.registry().feature_count();
    // Ends 200..=592: the last 7 days have no forward price.
    assert_eq!(output.summary.candidates, 393);
    assert_eq!(output.summary.built, 393);
    assert_eq!(output.summary.rejected, 0);
    assert_eq!(output.dataset.len(), 393);

    for sample in &output.dataset {
        assert_eq!(sample.sequence.timesteps(), 20);
        assert_eq!(sample.sequence.n_features(), f);
        assert!(!sample.synthetic);
        let expected = label(
            series.prices(),
            sample.sequence.end_index,
            &pipeline.config().label,
        );
        assert_eq!(sample.label, expected);
        // Feature 0 at the last timestep is that day's close.
        let close = sample.sequence.steps[19][0];
        assert_eq!(close, series.prices()[sample.sequence.end_index]);
    }
}

#[test]
fn test_stats_match_registry_and_round_trip() {
    let series = random_walk_series(11, 500);
    let pipeline = DatasetPipeline::new(FeatureRegistry::standard(), config()).unwrap();
    let output = pipeline.run(&series);
    let names = pipeline.registry().names();

    assert_eq!(output.stats.method, StatsMethod::Robust);
    assert_eq!(output.stats.n_features(), names.len());
    assert_eq!(output.stats.retained_indices, (0..names.len()).collect::<Vec<_>>());
    assert!(output.stats.validate_against(&names).is_ok());
    assert!(output.stats.scale.iter().all(|s| s.is_finite() && *s > 0.0));

    let json = output.stats.to_json().unwrap();
    let decoded = NormalizationStats::from_json(&json).unwrap();
    assert_eq!(decoded, output.stats);

    let normalized = output
        .stats
        .normalize_sequence(&output.dataset.samples[0].sequence);
    assert_eq!(normalized.timesteps(), 20);
    assert_eq!(normalized.n_features(), names.len());
}

#[test]
fn test_undersampled_classes_are_equal() {
    let series = random_walk_series(3, 600);
    let pipeline = DatasetPipeline::new(FeatureRegistry::standard(), config()).unwrap();
    let output = pipeline.run(&series);

    let raw = output.summary.raw_counts;
    assert!(raw.sell > 0 && raw.buy > 0);
    let counts = output.dataset.class_counts();
    assert_eq!(counts.sell, counts.buy);
    assert!(counts.buy <= raw.sell.min(raw.buy));
    assert_eq!(output.summary.balanced, output.dataset.len());
}

#[test]
fn test_smote_fills_minority_with_synthetic_samples() {
    let series = random_walk_series(5, 600);
    let config = config().with_balancing(BalancingStrategy::Smote);
    let pipeline = DatasetPipeline::new(FeatureRegistry::standard(), config).unwrap();
    let output = pipeline.run(&series);

    let raw = output.summary.raw_counts;
    let counts = output.dataset.class_counts();
    assert_eq!(counts.sell, raw.sell.max(raw.buy));
    assert_eq!(counts.buy, counts.sell);

    let minority = raw.minority();
    let synthetic: Vec<_> = output.dataset.iter().filter(|s| s.synthetic).collect();
    assert_eq!(synthetic.len(), raw.sell.abs_diff(raw.buy));
    assert!(synthetic.iter().all(|s| s.label == minority));
    assert!(
        synthetic
            .iter()
            .all(|s| s.sequence.flatten().iter().all(|v| v.is_finite()))
    );
}

#[test]
fn test_curriculum_keeps_easiest_fraction() {
    let series = random_walk_series(9, 600);
    let config = config()
        .with_balancing(BalancingStrategy::None)
        .with_curriculum_level(0.2);
    let pipeline = DatasetPipeline::new(FeatureRegistry::standard(), config).unwrap();
    let output = pipeline.run(&series);

    // floor(393 * 0.2) = 78
    assert_eq!(output.summary.balanced, 393);
    assert_eq!(output.dataset.len(), 78);
    assert!(output.dataset.len() >= MIN_CURRICULUM_SAMPLES);

    let scores: Vec<f64> = output
        .dataset
        .iter()
        .map(|s| s.difficulty.unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_runs_are_reproducible() {
    let series = random_walk_series(21, 450);
    let config = config()
        .with_balancing(BalancingStrategy::Auto)
        .with_selection(FeatureSelection::Decorrelated {
            max_features: 24,
            max_abs_correlation: 0.9,
        });
    let a = DatasetPipeline::new(FeatureRegistry::standard(), config.clone())
        .unwrap()
        .run(&series);
    let b = DatasetPipeline::new(FeatureRegistry::standard(), config.with_force_sequential(true))
        .unwrap()
        .run(&series);

    assert_eq!(a.dataset, b.dataset);
    assert_eq!(a.stats, b.stats);
    assert!(a.stats.n_retained() <= 24);
    assert!(a.stats.retained_indices.windows(2).all(|w| w[0] < w[1]));
}
