//! The refresh loop.
//!
//! Runs one pipeline cycle per timer tick and publishes the rendered
//! result. A cycle that fails is logged and skipped; the next tick
//! starts again from scratch.

use crate::cli::OutputFormat;
use crate::models::Snapshot;
use crate::pipeline::DashboardPipeline;
use crate::report::{
    generate_dashboard_html, generate_json_snapshot, ChartDescriptor, PageOptions, SvgRenderer,
};
use anyhow::{Context, Result};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Destination for rendered dashboards.
pub trait DashboardSink {
    /// Replace the published dashboard with `content`.
    fn publish(&mut self, content: &str) -> Result<()>;
}

/// Publishes to a file, replacing it atomically on every cycle.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DashboardSink for FileSink {
    fn publish(&mut self, content: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())
            .context("Failed to write dashboard")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to write dashboard to {}", self.path.display()))?;

        Ok(())
    }
}

/// How the refresh loop renders and paces cycles.
#[derive(Debug, Clone)]
pub struct RefreshOptions {
    pub interval: Duration,
    /// Stop after this many cycles; `None` runs until shutdown.
    pub max_cycles: Option<u64>,
    pub format: OutputFormat,
    pub page: PageOptions,
    pub renderer: SvgRenderer,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
            max_cycles: None,
            format: OutputFormat::Html,
            page: PageOptions::default(),
            renderer: SvgRenderer::default(),
        }
    }
}

/// Outcome of a refresh loop run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub cycles_run: u64,
    pub cycles_failed: u64,
}

/// Render a snapshot in the configured output format.
pub fn render_snapshot(
    snapshot: &Snapshot,
    layout: &[ChartDescriptor],
    options: &RefreshOptions,
) -> Result<String> {
    match options.format {
        OutputFormat::Html => {
            Ok(generate_dashboard_html(snapshot, layout, &options.renderer, &options.page)?)
        }
        OutputFormat::Json => generate_json_snapshot(snapshot),
    }
}

/// Run one cycle, render it, and publish it.
pub fn publish_cycle(
    pipeline: &mut DashboardPipeline,
    sink: &mut dyn DashboardSink,
    options: &RefreshOptions,
) -> Result<Snapshot> {
    let snapshot = pipeline.run_cycle();
    let content = render_snapshot(&snapshot, pipeline.layout(), options)
        .with_context(|| format!("Failed to render cycle {}", snapshot.metadata.cycle))?;
    sink.publish(&content)?;

    Ok(snapshot)
}

/// Drive the pipeline on a fixed timer until `shutdown` resolves or the
/// cycle limit is reached.
pub async fn run_refresh_loop<S, F>(
    pipeline: &mut DashboardPipeline,
    sink: &mut S,
    options: &RefreshOptions,
    shutdown: F,
) -> RefreshSummary
where
    S: DashboardSink,
    F: Future<Output = ()>,
{
    let mut summary = RefreshSummary::default();
    let mut ticker = tokio::time::interval(options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        if options.max_cycles.is_some_and(|max| summary.cycles_run >= max) {
            info!("Reached {} cycles, stopping", summary.cycles_run);
            break;
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping refresh loop");
                break;
            }
            _ = ticker.tick() => {}
        }

        let started = Instant::now();
        summary.cycles_run += 1;

        match publish_cycle(pipeline, sink, options) {
            Ok(snapshot) => {
                info!(
                    cycle = snapshot.metadata.cycle,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Dashboard refreshed"
                );
            }
            Err(e) => {
                summary.cycles_failed += 1;
                warn!(cycle = summary.cycles_run, "Skipping cycle: {:#}", e);
            }
        }
    }

    summary
}
