//! dataset-forge - Main binary
//!
//! Reads a market history file, runs the dataset pipeline, and writes the
//! labeled dataset and its normalization statistics as JSON.
//!
//! ```text
//! market.json ─► DatasetPipeline ─┬─► dataset.json
//!                                 └─► stats.json
//! ```
//!
//! Every option can come from a config file, a flag, or an environment
//! variable; flags win over the file.

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use dataset::DatasetPipeline;
use features::FeatureRegistry;
use tracing::info;
use types::{BalancingStrategy, PipelineConfig};

/// Build labeled training sequences from price and volume history
#[derive(Parser, Debug)]
#[command(name = "dataset-forge")]
#[command(about = "Turn price/volume history into labeled, fixed-shape training sequences")]
#[command(version)]
struct Args {
    /// Market history JSON: {"prices": [..], "volumes": [..], "highs"?: [..], "lows"?: [..]}
    #[arg(long, short, value_name = "FILE", env = "FORGE_INPUT")]
    input: PathBuf,

    /// Pipeline config JSON (missing keys use defaults)
    #[arg(long, short, value_name = "FILE", env = "FORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Timesteps per sequence
    #[arg(long, env = "FORGE_TIMESTEPS")]
    timesteps: Option<usize>,

    /// Minimum forward return for a buy label (fraction, exclusive)
    #[arg(long, env = "FORGE_THRESHOLD")]
    threshold: Option<f64>,

    /// Days ahead the forward return is measured over
    #[arg(long, env = "FORGE_HORIZON")]
    horizon: Option<usize>,

    /// Balancing strategy: none | undersample | smote | auto
    #[arg(long, env = "FORGE_BALANCING")]
    balancing: Option<BalancingStrategy>,

    /// Fraction of easiest samples to keep, in [0.1, 1.0]
    #[arg(long, env = "FORGE_CURRICULUM_LEVEL")]
    curriculum_level: Option<f64>,

    /// Seed for shuffling and SMOTE
    #[arg(long, env = "FORGE_SEED")]
    seed: Option<u64>,

    /// Distance between consecutive sequence end indices
    #[arg(long, env = "FORGE_STRIDE")]
    stride: Option<usize>,

    /// Run every stage sequentially
    #[arg(long, env = "FORGE_SEQUENTIAL")]
    sequential: bool,

    /// Where to write the normalization statistics
    #[arg(long, value_name = "FILE", default_value = "stats.json")]
    stats_out: PathBuf,

    /// Where to write the dataset (skipped when absent)
    #[arg(long, value_name = "FILE")]
    dataset_out: Option<PathBuf>,
}

/// Layer CLI/env overrides on top of the file config.
fn apply_overrides(mut config: PipelineConfig, args: &Args) -> PipelineConfig {
    if let Some(timesteps) = args.timesteps {
        config.timesteps = timesteps;
    }
    if let Some(threshold) = args.threshold {
        config.label.threshold = threshold;
    }
    if let Some(horizon) = args.horizon {
        config.label.horizon = horizon;
    }
    if let Some(balancing) = args.balancing {
        config.balancing = balancing;
    }
    if let Some(level) = args.curriculum_level {
        config.curriculum_level = level;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(stride) = args.stride {
        config.stride = stride;
    }
    if args.sequential {
        config.force_sequential = true;
    }
    config
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = apply_overrides(config::load_pipeline_config(args.config.as_deref())?, &args);
    let series = config::load_market(&args.input)?;
    info!(
        input = %args.input.display(),
        bars = series.len(),
        parallel = parallel::is_parallel_enabled() && !config.force_sequential,
        "loaded market series"
    );

    let pipeline = DatasetPipeline::new(FeatureRegistry::standard(), config)
        .context("invalid pipeline configuration")?;
    let output = pipeline.run(&series);

    write_file(&args.stats_out, &output.stats.to_json()?)?;
    info!(path = %args.stats_out.display(), "wrote normalization statistics");

    if let Some(path) = &args.dataset_out {
        let json = serde_json::to_string(&output.dataset).context("failed to encode dataset")?;
        write_file(path, &json)?;
        info!(path = %path.display(), samples = output.dataset.len(), "wrote dataset");
    }

    println!("{}", serde_json::to_string_pretty(&output.summary)?);
    Ok(())
}
