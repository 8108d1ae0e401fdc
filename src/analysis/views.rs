//! The nine derived dashboard views.
//!
//! `DashboardViews` keeps each view in its natural typed shape;
//! `ViewData` is the uniform shape handed to a chart renderer.

use crate::analysis::aggregator::HistogramBucket;
use crate::models::{Department, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one of the nine dashboard views, numbered 1 to 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    AvgHoursByDepartment,
    StatusCounts,
    ProductivityByEmployee,
    HoursVsProductivity,
    HoursDistribution,
    HoursByDepartment,
    TotalHoursByEmployee,
    AvgProductivityByDepartment,
    HoursProductivityDensity,
}

impl ViewId {
    /// Every view, in dashboard order.
    #[allow(dead_code)] // Used to walk all views
    pub const ALL: [ViewId; 9] = [
        ViewId::AvgHoursByDepartment,
        ViewId::StatusCounts,
        ViewId::ProductivityByEmployee,
        ViewId::HoursVsProductivity,
        ViewId::HoursDistribution,
        ViewId::HoursByDepartment,
        ViewId::TotalHoursByEmployee,
        ViewId::AvgProductivityByDepartment,
        ViewId::HoursProductivityDensity,
    ];

    /// 1-based position of the view on the dashboard.
    pub fn number(&self) -> usize {
        *self as usize + 1
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view {}", self.number())
    }
}

/// One point of the hours/productivity scatter view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub hours_worked: f64,
    pub productivity_pct: f64,
    pub department: Department,
}

/// All nine views derived from one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardViews {
    /// 1. Mean hours worked per department.
    pub avg_hours_by_department: BTreeMap<Department, f64>,
    /// 2. Number of employees per status.
    pub status_counts: BTreeMap<Status, usize>,
    /// 3. `(employee_id, productivity_pct)`, ascending by id.
    pub productivity_by_employee: Vec<(u32, f64)>,
    /// 4. Hours against productivity, coloured by department.
    pub hours_vs_productivity: Vec<ScatterPoint>,
    /// 5. Bucketed distribution of hours worked.
    pub hours_distribution: Vec<HistogramBucket>,
    /// 6. `(department, hours_worked)` for spread analysis.
    pub hours_by_department: Vec<(Department, f64)>,
    /// 7. Total hours per employee.
    pub total_hours_by_employee: BTreeMap<u32, f64>,
    /// 8. Mean productivity per department.
    pub avg_productivity_by_department: BTreeMap<Department, f64>,
    /// 9. `(hours_worked, productivity_pct)` pairs for density estimation.
    pub hours_productivity_pairs: Vec<(f64, f64)>,
}

/// A view in the shape a chart renderer consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    /// Labelled values (bar and pie charts).
    Categories(Vec<(String, f64)>),
    /// Ordered `(x, y)` series (line and area charts).
    Series(Vec<(f64, f64)>),
    /// Points with a department group (scatter charts).
    Points(Vec<ScatterPoint>),
    /// Pre-bucketed counts (histograms).
    Buckets(Vec<HistogramBucket>),
    /// Raw samples per group (box charts).
    Groups(Vec<(String, Vec<f64>)>),
    /// Unordered `(x, y)` pairs (density heatmaps).
    Pairs(Vec<(f64, f64)>),
}

impl ViewData {
    /// Short name of the data shape, used in error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            ViewData::Categories(_) => "categories",
            ViewData::Series(_) => "series",
            ViewData::Points(_) => "points",
            ViewData::Buckets(_) => "buckets",
            ViewData::Groups(_) => "groups",
            ViewData::Pairs(_) => "pairs",
        }
    }

    /// Returns true when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ViewData::Categories(v) => v.is_empty(),
            ViewData::Series(v) => v.is_empty(),
            ViewData::Points(v) => v.is_empty(),
            ViewData::Buckets(v) => v.is_empty(),
            ViewData::Groups(v) => v.is_empty(),
            ViewData::Pairs(v) => v.is_empty(),
        }
    }
}

impl DashboardViews {
    /// Convert one view into renderer input.
    pub fn view(&self, id: ViewId) -> ViewData {
        match id {
            ViewId::AvgHoursByDepartment => categories(&self.avg_hours_by_department),
            ViewId::StatusCounts => ViewData::Categories(
                self.status_counts
                    .iter()
                    .map(|(status, count)| (status.to_string(), *count as f64))
                    .collect(),
            ),
            ViewId::ProductivityByEmployee => ViewData::Series(
                self.productivity_by_employee
                    .iter()
                    .map(|(id, pct)| (f64::from(*id), *pct))
                    .collect(),
            ),
            ViewId::HoursVsProductivity => ViewData::Points(self.hours_vs_productivity.clone()),
            ViewId::HoursDistribution => ViewData::Buckets(self.hours_distribution.clone()),
            ViewId::HoursByDepartment => {
                let mut groups: BTreeMap<Department, Vec<f64>> = BTreeMap::new();
                for (department, hours) in &self.hours_by_department {
                    groups.entry(*department).or_default().push(*hours);
                }
                ViewData::Groups(
                    groups
                        .into_iter()
                        .map(|(department, values)| (department.to_string(), values))
                        .collect(),
                )
            }
            ViewId::TotalHoursByEmployee => ViewData::Series(
                self.total_hours_by_employee
                    .iter()
                    .map(|(id, hours)| (f64::from(*id), *hours))
                    .collect(),
            ),
            ViewId::AvgProductivityByDepartment => {
                categories(&self.avg_productivity_by_department)
            }
            ViewId::HoursProductivityDensity => {
                ViewData::Pairs(self.hours_productivity_pairs.clone())
            }
        }
    }
}

fn categories(map: &BTreeMap<Department, f64>) -> ViewData {
    ViewData::Categories(
        map.iter()
            .map(|(department, value)| (department.to_string(), *value))
            .collect(),
    )
}
