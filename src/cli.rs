//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Smallest refresh interval accepted, in milliseconds.
pub const MIN_INTERVAL_MS: u64 = 100;

/// Staffboard - live employee work-metric dashboard
///
/// Generates a fresh synthetic table of 50 employees on every refresh
/// and renders nine charts into a self-reloading HTML page.
///
/// Examples:
///   staffboard
///   staffboard --output board.html --interval-ms 2000
///   staffboard --once --seed 42 --format json --output snapshot.json
///   staffboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Output file path for the dashboard
    ///
    /// Defaults to the config file value, or staffboard.html.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .staffboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (html, json)
    #[arg(long, default_value = "html", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Refresh interval in milliseconds
    #[arg(long, value_name = "MS", env = "STAFFBOARD_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Seed for reproducible data
    ///
    /// Without a seed the data is drawn from operating-system entropy.
    #[arg(long, value_name = "N", env = "STAFFBOARD_SEED")]
    pub seed: Option<u64>,

    /// Run a single cycle, write the output, and exit
    #[arg(long)]
    pub once: bool,

    /// Stop after this many refresh cycles
    #[arg(long, value_name = "COUNT")]
    pub max_cycles: Option<u64>,

    /// Number of histogram buckets for hours worked
    #[arg(long, value_name = "NUM")]
    pub bins: Option<usize>,

    /// Include the raw dataset in JSON output
    #[arg(long)]
    pub include_dataset: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .staffboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Self-refreshing HTML page (default)
    #[default]
    Html,
    /// JSON snapshot of the views
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(interval) = self.interval_ms {
            if interval < MIN_INTERVAL_MS {
                return Err(format!(
                    "Refresh interval must be at least {} ms",
                    MIN_INTERVAL_MS
                ));
            }
        }

        if self.bins == Some(0) {
            return Err("Histogram bins must be at least 1".to_string());
        }

        if self.max_cycles == Some(0) {
            return Err("Max cycles must be at least 1".to_string());
        }

        if self.once && self.max_cycles.is_some() {
            return Err("Cannot use both --once and --max-cycles".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            output: None,
            config: None,
            format: OutputFormat::Html,
            interval_ms: None,
            seed: None,
            once: false,
            max_cycles: None,
            bins: None,
            include_dataset: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_default_args_are_valid() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.once = true;
        args.max_cycles = Some(3);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_interval() {
        let mut args = make_args();
        args.interval_ms = Some(50);
        assert!(args.validate().is_err());

        args.interval_ms = Some(MIN_INTERVAL_MS);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_bins() {
        let mut args = make_args();
        args.bins = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.init_config = true;
        args.bins = Some(0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_from_flags() {
        let args = Args::try_parse_from([
            "staffboard",
            "--once",
            "--seed",
            "42",
            "--format",
            "json",
            "--bins",
            "8",
        ])
        .unwrap();

        assert!(args.once);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.bins, Some(8));
    }
}
