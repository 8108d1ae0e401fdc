//! Dashboard page generation.
//!
//! This module assembles the rendered charts of one cycle into a
//! self-refreshing HTML page, or serializes the cycle as JSON.

use crate::error::DashboardError;
use crate::models::{Snapshot, SnapshotMetadata};
use crate::report::layout::{ChartDescriptor, ChartKind};
use crate::report::svg::ChartRenderer;
use anyhow::Result;

/// Default page heading.
pub const DEFAULT_TITLE: &str = "Neuro Tech Enclave Pvt Ltd - Employee Data Dashboard";

/// Page-level settings for the HTML dashboard.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Heading shown above the charts.
    pub title: String,
    /// Browser reload period in seconds.
    pub refresh_seconds: u64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            refresh_seconds: 5,
        }
    }
}

impl PageOptions {
    /// Reload period matching a refresh interval in milliseconds, at least one second.
    pub fn refresh_seconds_for(interval_ms: u64) -> u64 {
        interval_ms.div_ceil(1000).max(1)
    }
}

const STYLE: &str = "body{background-color:#e6f0ff;font-family:sans-serif;margin:0}\
.dashboard{max-width:1600px;margin:auto;padding:20px}\
h1{text-align:center}\
.grid{display:grid;grid-template-columns:1fr 1fr;gap:16px}\
.chart-card{background:#fff;border-radius:6px;padding:8px;height:400px}\
.chart-card.wide{grid-column:1 / -1}\
.chart-card svg{width:100%;height:100%}\
footer{text-align:center;color:#555;font-size:12px;margin-top:16px}";

/// Escape text for use inside HTML markup.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Generate the complete HTML dashboard for one cycle.
pub fn generate_dashboard_html(
    snapshot: &Snapshot,
    layout: &[ChartDescriptor],
    renderer: &dyn ChartRenderer,
    options: &PageOptions,
) -> Result<String, DashboardError> {
    let mut output = String::new();

    output.push_str(&generate_head(options));
    output.push_str("<body>\n<div class=\"dashboard\">\n");
    output.push_str(&format!("<h1>{}</h1>\n", escape(&options.title)));

    output.push_str("<div class=\"grid\">\n");
    for descriptor in layout {
        output.push_str(&generate_chart_section(snapshot, descriptor, renderer)?);
    }
    output.push_str("</div>\n");

    output.push_str(&generate_footer(&snapshot.metadata));
    output.push_str("</div>\n</body>\n</html>\n");

    Ok(output)
}

fn generate_head(options: &PageOptions) -> String {
    let mut head = String::new();

    head.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    head.push_str("<meta charset=\"utf-8\">\n");
    head.push_str(&format!(
        "<meta http-equiv=\"refresh\" content=\"{}\">\n",
        options.refresh_seconds
    ));
    head.push_str(&format!("<title>{}</title>\n", escape(&options.title)));
    head.push_str(&format!("<style>{}</style>\n", STYLE));
    head.push_str("</head>\n");

    head
}

/// Render one chart into its card.
fn generate_chart_section(
    snapshot: &Snapshot,
    descriptor: &ChartDescriptor,
    renderer: &dyn ChartRenderer,
) -> Result<String, DashboardError> {
    let data = snapshot.views.view(descriptor.view_id);
    let chart = renderer.render(descriptor.kind, &data, descriptor.title)?;

    let class = match descriptor.kind {
        ChartKind::Heatmap => "chart-card wide",
        _ => "chart-card",
    };

    Ok(format!(
        "<section id=\"{}\" class=\"{}\">\n{}</section>\n",
        descriptor.anchor(),
        class,
        chart
    ))
}

fn generate_footer(metadata: &SnapshotMetadata) -> String {
    let mut footer = String::new();

    footer.push_str("<footer>");
    footer.push_str(&format!(
        "Cycle {} | {} employees | generated {}",
        metadata.cycle,
        metadata.record_count,
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(seed) = metadata.seed {
        footer.push_str(&format!(" | seed {}", seed));
    }
    footer.push_str("</footer>\n");

    footer
}

/// Generate a JSON snapshot.
pub fn generate_json_snapshot(snapshot: &Snapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::generator::RecordGenerator;
    use crate::report::layout::DASHBOARD_LAYOUT;
    use crate::report::svg::SvgRenderer;
    use chrono::Utc;

    fn create_test_snapshot(include_dataset: bool) -> Snapshot {
        let dataset = RecordGenerator::seeded(99).generate();

        Snapshot {
            metadata: SnapshotMetadata {
                cycle: 3,
                generated_at: Utc::now(),
                record_count: dataset.len(),
                seed: Some(99),
            },
            views: aggregate(&dataset),
            dataset: include_dataset.then_some(dataset),
        }
    }

    #[test]
    fn test_generate_dashboard_html() {
        let snapshot = create_test_snapshot(false);
        let html = generate_dashboard_html(
            &snapshot,
            &DASHBOARD_LAYOUT,
            &SvgRenderer::default(),
            &PageOptions::default(),
        )
        .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"5\">"));
        assert!(html.contains(DEFAULT_TITLE));
        assert_eq!(html.matches("<section ").count(), 9);
        assert_eq!(html.matches("<svg ").count(), 9);
        assert!(html.contains("Cycle 3 | 50 employees"));
        assert!(html.contains("seed 99"));
    }

    #[test]
    fn test_sections_follow_layout_order() {
        let snapshot = create_test_snapshot(false);
        let html = generate_dashboard_html(
            &snapshot,
            &DASHBOARD_LAYOUT,
            &SvgRenderer::default(),
            &PageOptions::default(),
        )
        .unwrap();

        let positions: Vec<usize> = DASHBOARD_LAYOUT
            .iter()
            .map(|d| html.find(&format!("id=\"{}\"", d.anchor())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains("id=\"chart-9-heatmap\" class=\"chart-card wide\""));
    }

    #[test]
    fn test_title_is_escaped() {
        let snapshot = create_test_snapshot(false);
        let options = PageOptions {
            title: "R&D <Team>".to_string(),
            refresh_seconds: 10,
        };
        let html =
            generate_dashboard_html(&snapshot, &DASHBOARD_LAYOUT, &SvgRenderer::default(), &options)
                .unwrap();

        assert!(html.contains("<h1>R&amp;D &lt;Team&gt;</h1>"));
        assert!(html.contains("content=\"10\""));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("\"x\" 'y'"), "&quot;x&quot; &#39;y&#39;");
    }

    #[test]
    fn test_refresh_seconds_for() {
        assert_eq!(PageOptions::refresh_seconds_for(5000), 5);
        assert_eq!(PageOptions::refresh_seconds_for(2500), 3);
        assert_eq!(PageOptions::refresh_seconds_for(100), 1);
    }

    #[test]
    fn test_generate_json_snapshot() {
        let json = generate_json_snapshot(&create_test_snapshot(false)).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"views\""));
        assert!(json.contains("\"status_counts\""));
        assert!(!json.contains("\"dataset\""));

        let with_data = generate_json_snapshot(&create_test_snapshot(true)).unwrap();
        assert!(with_data.contains("\"dataset\""));
        assert!(with_data.contains("\"Employee ID\""));
    }
}
