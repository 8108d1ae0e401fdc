//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.staffboard.toml` files.

use crate::analysis::DEFAULT_HISTOGRAM_BINS;
use crate::report::generator::DEFAULT_TITLE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".staffboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Refresh timer settings.
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Data generator settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Dashboard rendering settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "staffboard.html".to_string()
}

/// Refresh timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Milliseconds between cycles.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Stop after this many cycles; 0 runs until interrupted.
    #[serde(default)]
    pub max_cycles: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_cycles: 0,
        }
    }
}

fn default_interval_ms() -> u64 {
    5000
}

/// Data generator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Fixed seed; omitted means operating-system entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Dashboard rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Page heading.
    #[serde(default = "default_title")]
    pub title: String,

    /// Buckets in the hours-worked histogram.
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Grid cells per axis in the heatmap.
    #[serde(default = "default_heatmap_bins")]
    pub heatmap_bins: usize,

    /// Include the raw dataset in JSON snapshots.
    #[serde(default)]
    pub include_dataset: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            histogram_bins: default_histogram_bins(),
            heatmap_bins: default_heatmap_bins(),
            include_dataset: false,
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

fn default_heatmap_bins() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.staffboard.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(interval) = args.interval_ms {
            self.refresh.interval_ms = interval;
        }
        if let Some(max_cycles) = args.max_cycles {
            self.refresh.max_cycles = max_cycles;
        }

        if args.seed.is_some() {
            self.generator.seed = args.seed;
        }

        if let Some(bins) = args.bins {
            self.dashboard.histogram_bins = bins;
        }

        // Flags always override
        if args.include_dataset {
            self.dashboard.include_dataset = true;
        }
    }

    /// Check values a config file could have set out of range.
    pub fn validate(&self) -> Result<()> {
        if self.refresh.interval_ms < crate::cli::MIN_INTERVAL_MS {
            anyhow::bail!(crate::error::DashboardError::InvalidOption(format!(
                "refresh.interval_ms must be at least {}",
                crate::cli::MIN_INTERVAL_MS
            )));
        }
        if self.dashboard.histogram_bins == 0 {
            anyhow::bail!(crate::error::DashboardError::InvalidOption(
                "dashboard.histogram_bins must be at least 1".to_string()
            ));
        }
        if self.dashboard.heatmap_bins == 0 {
            anyhow::bail!(crate::error::DashboardError::InvalidOption(
                "dashboard.heatmap_bins must be at least 1".to_string()
            ));
        }

        Ok(())
    }

    /// Cycle limit, `None` when unbounded.
    pub fn max_cycles(&self) -> Option<u64> {
        (self.refresh.max_cycles > 0).then_some(self.refresh.max_cycles)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
