//! Staffboard - live employee work-metric dashboard
//!
//! A CLI tool that generates a fresh synthetic table of employee
//! records on a fixed timer and renders nine charts from it into a
//! self-refreshing HTML page.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, entropy, output failure, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod generator;
mod models;
mod pipeline;
mod refresh;
mod report;

use analysis::AggregateOptions;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use generator::RecordGenerator;
use pipeline::DashboardPipeline;
use refresh::{FileSink, RefreshOptions};
use report::{PageOptions, SvgRenderer};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Staffboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_dashboard(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .staffboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the refresh interval, seed, and charts.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Build the pipeline once and run it, either for one cycle or on the timer.
async fn run_dashboard(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let generator = RecordGenerator::new(config.generator.seed)?;
    match generator.seed() {
        Some(seed) => info!("Using fixed seed {}", seed),
        None => debug!("Using operating-system entropy"),
    }

    let mut pipeline = DashboardPipeline::new(
        generator,
        AggregateOptions {
            histogram_bins: config.dashboard.histogram_bins,
        },
    )
    .with_dataset(config.dashboard.include_dataset);

    let options = RefreshOptions {
        interval: Duration::from_millis(config.refresh.interval_ms),
        max_cycles: config.max_cycles(),
        format: args.format,
        page: PageOptions {
            title: config.dashboard.title.clone(),
            refresh_seconds: PageOptions::refresh_seconds_for(config.refresh.interval_ms),
        },
        renderer: SvgRenderer {
            heatmap_bins: config.dashboard.heatmap_bins,
            ..SvgRenderer::default()
        },
    };

    let mut sink = FileSink::new(&config.general.output);

    if args.once {
        let snapshot = refresh::publish_cycle(&mut pipeline, &mut sink, &options)?;
        print_summary(&snapshot, &sink, args.format);
        return Ok(());
    }

    println!("{}", loop_banner(sink.path(), config.refresh.interval_ms));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let summary = refresh::run_refresh_loop(&mut pipeline, &mut sink, &options, shutdown).await;

    println!(
        "\n✅ Stopped after {} cycles ({} skipped).",
        summary.cycles_run, summary.cycles_failed
    );

    Ok(())
}

/// Startup line for the refresh loop.
fn loop_banner(output: &std::path::Path, interval_ms: u64) -> String {
    format!(
        "📊 Writing dashboard to {} (refresh every {} ms, Ctrl-C to stop)",
        output.display(),
        interval_ms
    )
}

/// Print a short summary of a single cycle.
fn print_summary(snapshot: &models::Snapshot, sink: &FileSink, format: OutputFormat) {
    let views = &snapshot.views;

    println!("\n📊 Cycle Summary:");
    println!("   Employees: {}", snapshot.metadata.record_count);
    for (department, hours) in &views.avg_hours_by_department {
        println!("   - {}: {:.2} h avg", department, hours);
    }
    let statuses: Vec<String> = views
        .status_counts
        .iter()
        .map(|(status, count)| format!("{} {}", status, count))
        .collect();
    println!("   Status: {}", statuses.join(" | "));

    let kind = match format {
        OutputFormat::Html => "Dashboard",
        OutputFormat::Json => "Snapshot",
    };
    println!("\n✅ {} saved to: {}", kind, sink.path().display());
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_banner_names_output_file() {
        let banner = loop_banner(std::path::Path::new("board.html"), 2000);
        assert!(banner.contains("Writing dashboard to board.html"));
        assert!(banner.contains("every 2000 ms"));
        assert!(!banner.contains("Serving"));
    }
}
