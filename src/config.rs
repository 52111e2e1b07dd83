//! Input files for the `dataset-forge` binary.
//!
//! The market file is JSON with equal-length arrays:
//!
//! ```json
//! { "prices": [101.2, 101.9], "volumes": [12000, 9800], "highs": [..], "lows": [..] }
//! ```
//!
//! `highs` and `lows` are optional and must be given together. The pipeline
//! config file is a (possibly partial) JSON [`PipelineConfig`]; missing keys
//! take their defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;
use types::{MarketSeries, PipelineConfig};

/// Raw market history as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketFile {
    pub prices: Vec<f64>,
    pub volumes: Vec<f64>,
    #[serde(default)]
    pub highs: Option<Vec<f64>>,
    #[serde(default)]
    pub lows: Option<Vec<f64>>,
}

impl MarketFile {
    pub fn into_series(self) -> anyhow::Result<MarketSeries> {
        let series = match (self.highs, self.lows) {
            (Some(highs), Some(lows)) => {
                MarketSeries::with_high_low(self.prices, self.volumes, highs, lows)?
            }
            (None, None) => MarketSeries::new(self.prices, self.volumes)?,
            _ => bail!("highs and lows must be provided together"),
        };
        Ok(series)
    }
}

/// Read and validate the market series at `path`.
pub fn load_market(path: &Path) -> anyhow::Result<MarketSeries> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read market file {}", path.display()))?;
    let file: MarketFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse market file {}", path.display()))?;
    file.into_series()
        .with_context(|| format!("invalid market series in {}", path.display()))
}

/// Read a pipeline config, or the defaults when no path is given.
pub fn load_pipeline_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_file_without_high_low() {
        let file: MarketFile =
            serde_json::from_str(r#"{"prices": [1.0, 2.0, 3.0], "volumes": [5, 5, 5]}"#).unwrap();
        let series = file.into_series().unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.highs(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_market_file_rejects_lone_highs() {
        let file: MarketFile =
            serde_json::from_str(r#"{"prices": [1.0], "volumes": [5], "highs": [1.5]}"#).unwrap();
        assert!(file.into_series().is_err());
    }

    #[test]
    fn test_market_file_rejects_length_mismatch() {
        let file: MarketFile =
            serde_json::from_str(r#"{"prices": [1.0, 2.0], "volumes": [5]}"#).unwrap();
        assert!(file.into_series().is_err());
    }

    #[test]
    fn test_missing_config_path_gives_defaults() {
        assert_eq!(load_pipeline_config(None).unwrap(), PipelineConfig::default());
    }
}
