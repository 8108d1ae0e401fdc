//! Data models for the employee dashboard.
//!
//! This module contains the core data structures used throughout
//! the application for representing employee records, datasets,
//! and cycle snapshots.

use crate::analysis::DashboardViews;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of employees in every generated dataset.
pub const EMPLOYEE_COUNT: u32 = 50;

/// Inclusive range for generated hours worked.
pub const HOURS_RANGE: (f64, f64) = (5.0, 9.0);

/// Inclusive range for generated productivity percentages.
pub const PRODUCTIVITY_RANGE: (f64, f64) = (60.0, 100.0);

/// Department an employee belongs to.
///
/// Variants are declared alphabetically so grouped views list departments
/// by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    #[serde(rename = "HR")]
    Hr,
    Marketing,
    Product,
    Sales,
}

impl Department {
    /// Every department, in display order.
    pub const ALL: [Department; 5] = [
        Department::Engineering,
        Department::Hr,
        Department::Marketing,
        Department::Product,
        Department::Sales,
    ];
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Department::Engineering => write!(f, "Engineering"),
            Department::Hr => write!(f, "HR"),
            Department::Marketing => write!(f, "Marketing"),
            Department::Product => write!(f, "Product"),
            Department::Sales => write!(f, "Sales"),
        }
    }
}

/// Current activity status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Idle,
    #[serde(rename = "On Break")]
    OnBreak,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Status; 3] = [Status::Active, Status::Idle, Status::OnBreak];
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => write!(f, "Active"),
            Status::Idle => write!(f, "Idle"),
            Status::OnBreak => write!(f, "On Break"),
        }
    }
}

/// One synthetic employee row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Positional identifier in `1..=EMPLOYEE_COUNT`.
    #[serde(rename = "Employee ID")]
    pub employee_id: u32,
    #[serde(rename = "Department")]
    pub department: Department,
    /// Hours worked, rounded to two decimals.
    #[serde(rename = "Hours Worked")]
    pub hours_worked: f64,
    /// Productivity percentage, rounded to two decimals.
    #[serde(rename = "Productivity (%)")]
    pub productivity_pct: f64,
    #[serde(rename = "Status")]
    pub status: Status,
}

/// A full table of employee records for one refresh cycle.
pub type Dataset = Vec<EmployeeRecord>;

/// Round to two decimal places, ties away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Metadata about one refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// 1-based cycle number since startup.
    pub cycle: u64,
    /// When the dataset was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records in the dataset.
    pub record_count: usize,
    /// Seed of the randomness source, if reproducible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Everything produced by one generate-and-aggregate cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    /// The raw dataset, only kept when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<Dataset>,
    pub views: DashboardViews,
}
