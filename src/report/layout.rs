//! Chart layout: which view is drawn as which chart, and under what title.

use crate::analysis::ViewId;
use serde::Serialize;
use std::fmt;

/// Kind of chart a view is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Scatter,
    Histogram,
    Box,
    Area,
    Heatmap,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Pie => write!(f, "pie"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Scatter => write!(f, "scatter"),
            ChartKind::Histogram => write!(f, "histogram"),
            ChartKind::Box => write!(f, "box"),
            ChartKind::Area => write!(f, "area"),
            ChartKind::Heatmap => write!(f, "heatmap"),
        }
    }
}

/// One chart slot on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartDescriptor {
    pub view_id: ViewId,
    pub kind: ChartKind,
    pub title: &'static str,
}

impl ChartDescriptor {
    /// Element id used for the chart's section in the page.
    pub fn anchor(&self) -> String {
        format!("chart-{}-{}", self.view_id.number(), self.kind)
    }
}

/// The dashboard's nine charts, in display order.
pub const DASHBOARD_LAYOUT: [ChartDescriptor; 9] = [
    ChartDescriptor {
        view_id: ViewId::AvgHoursByDepartment,
        kind: ChartKind::Bar,
        title: "Avg Hours Worked by Dept",
    },
    ChartDescriptor {
        view_id: ViewId::StatusCounts,
        kind: ChartKind::Pie,
        title: "AI Driven Employee Status Distribution",
    },
    ChartDescriptor {
        view_id: ViewId::ProductivityByEmployee,
        kind: ChartKind::Line,
        title: "Productivity per Employee",
    },
    ChartDescriptor {
        view_id: ViewId::HoursVsProductivity,
        kind: ChartKind::Scatter,
        title: "Scatter: Hours Worked vs Productivity",
    },
    ChartDescriptor {
        view_id: ViewId::HoursDistribution,
        kind: ChartKind::Histogram,
        title: "Histogram: Distribution of Hours Worked",
    },
    ChartDescriptor {
        view_id: ViewId::HoursByDepartment,
        kind: ChartKind::Box,
        title: "Box Plot: Hours Worked by Department",
    },
    ChartDescriptor {
        view_id: ViewId::TotalHoursByEmployee,
        kind: ChartKind::Area,
        title: "Area Chart: Total Hours Worked",
    },
    ChartDescriptor {
        view_id: ViewId::AvgProductivityByDepartment,
        kind: ChartKind::Bar,
        title: "Avg Productivity by Dept",
    },
    ChartDescriptor {
        view_id: ViewId::HoursProductivityDensity,
        kind: ChartKind::Heatmap,
        title: "Heatmap: Hours Worked vs Productivity",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_positional() {
        let kinds: Vec<ChartKind> = DASHBOARD_LAYOUT.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Bar,
                ChartKind::Pie,
                ChartKind::Line,
                ChartKind::Scatter,
                ChartKind::Histogram,
                ChartKind::Box,
                ChartKind::Area,
                ChartKind::Bar,
                ChartKind::Heatmap,
            ]
        );

        for (descriptor, view_id) in DASHBOARD_LAYOUT.iter().zip(ViewId::ALL) {
            assert_eq!(descriptor.view_id, view_id);
        }
    }

    #[test]
    fn test_anchor() {
        assert_eq!(DASHBOARD_LAYOUT[1].anchor(), "chart-2-pie");
        assert_eq!(DASHBOARD_LAYOUT[8].anchor(), "chart-9-heatmap");
    }
}
