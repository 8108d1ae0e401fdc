//! Chart rendering.
//!
//! `SvgRenderer` draws every `ChartKind` with plotters into an in-memory
//! SVG document, which the page generator embeds directly in the dashboard.

use crate::analysis::{density_grid, HistogramBucket, ScatterPoint, ViewData};
use crate::error::DashboardError;
use crate::models::Department;
use crate::report::layout::ChartKind;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;

/// Draws one view as one chart.
pub trait ChartRenderer {
    /// Render `data` as a `kind` chart titled `title`.
    fn render(
        &self,
        kind: ChartKind,
        data: &ViewData,
        title: &str,
    ) -> Result<String, DashboardError>;
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const PRIMARY: RGBColor = RGBColor(0x63, 0x6e, 0xfa);
const PALETTE: [RGBColor; 6] = [
    RGBColor(0x63, 0x6e, 0xfa),
    RGBColor(0xef, 0x55, 0x3b),
    RGBColor(0x00, 0xcc, 0x96),
    RGBColor(0xab, 0x63, 0xfa),
    RGBColor(0xff, 0xa1, 0x5a),
    RGBColor(0x19, 0xd3, 0xf3),
];

/// Renders charts as inline SVG.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
    /// Grid resolution of heatmap charts on each axis.
    pub heatmap_bins: usize,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            heatmap_bins: 10,
        }
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(
        &self,
        kind: ChartKind,
        data: &ViewData,
        title: &str,
    ) -> Result<String, DashboardError> {
        if !accepts(kind, data) {
            return Err(DashboardError::ChartMismatch {
                kind,
                data: data.shape_name(),
            });
        }

        let mut svg = String::new();
        self.draw(&mut svg, kind, data, title)
            .map_err(|e| DashboardError::Draw {
                kind,
                reason: e.to_string(),
            })?;

        Ok(svg)
    }
}

/// Whether `kind` can draw data of this shape.
fn accepts(kind: ChartKind, data: &ViewData) -> bool {
    matches!(
        (kind, data),
        (ChartKind::Bar | ChartKind::Pie, ViewData::Categories(_))
            | (ChartKind::Line | ChartKind::Area, ViewData::Series(_))
            | (ChartKind::Scatter, ViewData::Points(_))
            | (ChartKind::Histogram, ViewData::Buckets(_))
            | (ChartKind::Box, ViewData::Groups(_))
            | (ChartKind::Heatmap, ViewData::Pairs(_))
    )
}

fn department_color(department: Department) -> RGBColor {
    let index = Department::ALL
        .iter()
        .position(|d| *d == department)
        .unwrap_or(0);
    PALETTE[index % PALETTE.len()]
}

/// Widen a degenerate range so the axis never collapses.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn range_of(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo.is_finite() && hi.is_finite() {
        padded(lo, hi)
    } else {
        (0.0, 1.0)
    }
}

/// Axis label for a categorical segment.
fn segment_label(value: &SegmentValue<u32>, labels: &[&str]) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
            .get(*i as usize)
            .map(|label| label.to_string())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

impl SvgRenderer {
    fn draw(&self, buf: &mut String, kind: ChartKind, data: &ViewData, title: &str) -> Result<()> {
        let root = SVGBackend::with_string(buf, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        match data {
            data if data.is_empty() => self.placeholder(&root, title)?,
            ViewData::Categories(slices) if kind == ChartKind::Pie => {
                self.pie_chart(&root, title, slices)?
            }
            ViewData::Categories(bars) => self.bar_chart(&root, title, bars)?,
            ViewData::Series(series) => {
                self.line_chart(&root, title, series, kind == ChartKind::Area)?
            }
            ViewData::Points(points) => self.scatter_chart(&root, title, points)?,
            ViewData::Buckets(buckets) => self.histogram_chart(&root, title, buckets)?,
            ViewData::Groups(groups) => self.box_chart(&root, title, groups)?,
            ViewData::Pairs(pairs) => self.heatmap_chart(&root, title, pairs)?,
        }

        root.present()?;
        Ok(())
    }

    fn placeholder(&self, root: &Area<'_>, title: &str) -> Result<()> {
        let area = root.titled(title, ("sans-serif", 20))?;
        let (width, height) = area.dim_in_pixel();

        area.draw(&Text::new(
            "No data",
            (width as i32 / 2 - 30, height as i32 / 2),
            ("sans-serif", 16).into_font().color(&BLACK.mix(0.5)),
        ))?;

        Ok(())
    }

    fn bar_chart(&self, root: &Area<'_>, title: &str, bars: &[(String, f64)]) -> Result<()> {
        let labels: Vec<&str> = bars.iter().map(|(label, _)| label.as_str()).collect();
        let top = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let (_, top) = padded(0.0, top * 1.15);

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..bars.len() as u32).into_segmented(), 0f64..top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len())
            .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, &labels))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(PRIMARY.filled())
                .margin(12)
                .data(bars.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
        )?;

        chart.draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
            Text::new(
                format!("{:.2}", v),
                (SegmentValue::CenterOf(i as u32), *v),
                ("sans-serif", 12),
            )
        }))?;

        Ok(())
    }

    fn pie_chart(&self, root: &Area<'_>, title: &str, slices: &[(String, f64)]) -> Result<()> {
        let sizes: Vec<f64> = slices.iter().map(|(_, v)| v.max(0.0)).collect();
        let total: f64 = sizes.iter().sum();
        if total <= 0.0 {
            return self.placeholder(root, title);
        }

        let area = root.titled(title, ("sans-serif", 20))?;
        let (width, height) = area.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.35;

        let colors: Vec<RGBColor> = (0..slices.len())
            .map(|i| PALETTE[i % PALETTE.len()])
            .collect();
        let labels: Vec<String> = slices
            .iter()
            .zip(&sizes)
            .map(|((label, _), size)| format!("{} ({:.1}%)", label, size / total * 100.0))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes[..], &colors[..], &labels[..]);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 14).into_font());
        area.draw(&pie)?;

        Ok(())
    }

    fn line_chart(
        &self,
        root: &Area<'_>,
        title: &str,
        series: &[(f64, f64)],
        filled: bool,
    ) -> Result<()> {
        let x_range = range_of(series.iter().map(|(x, _)| *x));
        let y_range = if filled {
            padded(0.0, series.iter().map(|(_, y)| *y).fold(0.0, f64::max))
        } else {
            range_of(series.iter().map(|(_, y)| *y))
        };

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

        chart.configure_mesh().x_desc("Employee ID").draw()?;

        if filled {
            chart.draw_series(
                AreaSeries::new(series.iter().copied(), y_range.0, PRIMARY.mix(0.35))
                    .border_style(PRIMARY.stroke_width(2)),
            )?;
        } else {
            chart.draw_series(LineSeries::new(
                series.iter().copied(),
                PRIMARY.stroke_width(2),
            ))?;
        }

        Ok(())
    }

    fn scatter_chart(&self, root: &Area<'_>, title: &str, points: &[ScatterPoint]) -> Result<()> {
        let x_range = range_of(points.iter().map(|p| p.hours_worked));
        let y_range = range_of(points.iter().map(|p| p.productivity_pct));

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

        chart
            .configure_mesh()
            .x_desc("Hours Worked")
            .y_desc("Productivity (%)")
            .draw()?;

        for department in Department::ALL {
            let color = department_color(department);
            let members: Vec<(f64, f64)> = points
                .iter()
                .filter(|p| p.department == department)
                .map(|p| (p.hours_worked, p.productivity_pct))
                .collect();
            if members.is_empty() {
                continue;
            }

            chart
                .draw_series(
                    members
                        .into_iter()
                        .map(|point| Circle::new(point, 4, color.filled())),
                )?
                .label(department.to_string())
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }

    fn histogram_chart(
        &self,
        root: &Area<'_>,
        title: &str,
        buckets: &[HistogramBucket],
    ) -> Result<()> {
        let edges: Vec<String> = buckets.iter().map(|b| format!("{:.1}", b.lower)).collect();
        let labels: Vec<&str> = edges.iter().map(String::as_str).collect();
        let top = buckets.iter().map(|b| b.count).max().unwrap_or(0) as u32 + 1;

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..buckets.len() as u32).into_segmented(), 0u32..top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(buckets.len())
            .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, &labels))
            .x_desc("Hours Worked")
            .y_desc("Count")
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(PRIMARY.filled())
                .margin(1)
                .data(
                    buckets
                        .iter()
                        .enumerate()
                        .map(|(i, b)| (i as u32, b.count as u32)),
                ),
        )?;

        Ok(())
    }

    fn box_chart(&self, root: &Area<'_>, title: &str, groups: &[(String, Vec<f64>)]) -> Result<()> {
        let summaries: Vec<(&str, Quartiles)> = groups
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(label, values)| (label.as_str(), Quartiles::new(values.as_slice())))
            .collect();
        if summaries.is_empty() {
            return self.placeholder(root, title);
        }

        let labels: Vec<&str> = summaries.iter().map(|(label, _)| *label).collect();
        let fences = summaries
            .iter()
            .flat_map(|(_, q)| q.values().into_iter().map(f64::from));
        let (lo, hi) = range_of(fences);

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(
                (0u32..summaries.len() as u32).into_segmented(),
                lo as f32..hi as f32,
            )?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(summaries.len())
            .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, &labels))
            .y_desc("Hours Worked")
            .draw()?;

        chart.draw_series(summaries.iter().enumerate().map(|(i, (_, quartiles))| {
            Boxplot::new_vertical(SegmentValue::CenterOf(i as u32), quartiles)
                .width(30)
                .whisker_width(0.5)
                .style(PALETTE[i % PALETTE.len()])
        }))?;

        Ok(())
    }

    fn heatmap_chart(&self, root: &Area<'_>, title: &str, pairs: &[(f64, f64)]) -> Result<()> {
        let grid = density_grid(pairs, self.heatmap_bins, self.heatmap_bins);
        if grid.is_empty() {
            return self.placeholder(root, title);
        }

        let max = grid.max_count().max(1) as f64;
        let x_range = padded(grid.x_range.0, grid.x_range.1);
        let y_range = padded(grid.y_range.0, grid.y_range.1);
        let cell_width = (x_range.1 - x_range.0) / self.heatmap_bins as f64;
        let cell_height = (y_range.1 - y_range.0) / self.heatmap_bins as f64;

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Hours Worked")
            .y_desc("Productivity (%)")
            .draw()?;

        // Row 0 holds the lowest y values.
        let cells = grid.counts.iter().enumerate().flat_map(|(row, counts)| {
            counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(move |(col, count)| {
                    let x0 = x_range.0 + cell_width * col as f64;
                    let y0 = y_range.0 + cell_height * row as f64;
                    Rectangle::new(
                        [(x0, y0), (x0 + cell_width, y0 + cell_height)],
                        PRIMARY.mix(*count as f64 / max).filled(),
                    )
                })
        });
        chart.draw_series(cells)?;

        Ok(())
    }
}
