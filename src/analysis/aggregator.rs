//! Dataset aggregation and statistics.
//!
//! This module provides the grouping and reduction utilities that turn
//! one employee dataset into the nine dashboard views, plus the density
//! grid the heatmap chart needs.

use crate::analysis::views::{DashboardViews, ScatterPoint};
use crate::models::EmployeeRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Default number of equal-width histogram buckets.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Tuning knobs for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Number of buckets for the hours-worked distribution.
    pub histogram_bins: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// One equal-width histogram bucket, `[lower, upper)` except the last
/// bucket which also includes `upper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Counts of `(x, y)` pairs over a regular grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityGrid {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// `counts[row][col]`, row indexes y and col indexes x.
    pub counts: Vec<Vec<usize>>,
}

impl DensityGrid {
    /// Returns true when the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Largest cell count, 0 for an empty grid.
    pub fn max_count(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Aggregate a dataset with default options.
#[allow(dead_code)] // Convenience entry point; the pipeline passes explicit options
pub fn aggregate(dataset: &[EmployeeRecord]) -> DashboardViews {
    aggregate_with(dataset, &AggregateOptions::default())
}

/// Aggregate a dataset into the nine dashboard views.
pub fn aggregate_with(dataset: &[EmployeeRecord], options: &AggregateOptions) -> DashboardViews {
    let hours: Vec<f64> = dataset.iter().map(|r| r.hours_worked).collect();

    let mut productivity_by_employee: Vec<(u32, f64)> = dataset
        .iter()
        .map(|r| (r.employee_id, r.productivity_pct))
        .collect();
    productivity_by_employee.sort_by_key(|(id, _)| *id);

    let views = DashboardViews {
        avg_hours_by_department: grouped_mean(dataset, |r| r.department, |r| r.hours_worked),
        status_counts: count_by(dataset, |r| r.status),
        productivity_by_employee,
        hours_vs_productivity: dataset
            .iter()
            .map(|r| ScatterPoint {
                hours_worked: r.hours_worked,
                productivity_pct: r.productivity_pct,
                department: r.department,
            })
            .collect(),
        hours_distribution: histogram(&hours, options.histogram_bins),
        hours_by_department: dataset
            .iter()
            .map(|r| (r.department, r.hours_worked))
            .collect(),
        total_hours_by_employee: grouped_sum(dataset, |r| r.employee_id, |r| r.hours_worked),
        avg_productivity_by_department: grouped_mean(
            dataset,
            |r| r.department,
            |r| r.productivity_pct,
        ),
        hours_productivity_pairs: dataset
            .iter()
            .map(|r| (r.hours_worked, r.productivity_pct))
            .collect(),
    };

    debug!(
        "Aggregated {} records into {} departments, {} buckets",
        dataset.len(),
        views.avg_hours_by_department.len(),
        views.hours_distribution.len()
    );

    views
}

/// Mean of `value` per `key`. Groups only exist for keys that occur.
pub fn grouped_mean<K, FK, FV>(records: &[EmployeeRecord], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&EmployeeRecord) -> K,
    FV: Fn(&EmployeeRecord) -> f64,
{
    let mut sums: BTreeMap<K, (f64, usize)> = BTreeMap::new();

    for record in records {
        let entry = sums.entry(key(record)).or_insert((0.0, 0));
        entry.0 += value(record);
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(k, (sum, count))| (k, sum / count as f64))
        .collect()
}

/// Sum of `value` per `key`.
pub fn grouped_sum<K, FK, FV>(records: &[EmployeeRecord], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&EmployeeRecord) -> K,
    FV: Fn(&EmployeeRecord) -> f64,
{
    let mut sums: BTreeMap<K, f64> = BTreeMap::new();

    for record in records {
        *sums.entry(key(record)).or_default() += value(record);
    }

    sums
}

/// Number of records per `key`.
pub fn count_by<K, FK>(records: &[EmployeeRecord], key: FK) -> BTreeMap<K, usize>
where
    K: Ord,
    FK: Fn(&EmployeeRecord) -> K,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();

    for record in records {
        *counts.entry(key(record)).or_default() += 1;
    }

    counts
}

/// Partition the observed range of `values` into `bins` equal-width buckets.
///
/// Returns no buckets for empty input or `bins == 0`. When every value
/// is identical the whole sample lands in one zero-width bucket.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBucket> {
    let Some((min, max)) = value_range(values) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    if max <= min {
        return vec![HistogramBucket {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let edges = lower_edges(min, width, bins);
    let mut buckets: Vec<HistogramBucket> = edges
        .iter()
        .enumerate()
        .map(|(i, lower)| HistogramBucket {
            lower: *lower,
            upper: edges.get(i + 1).copied().unwrap_or(max),
            count: 0,
        })
        .collect();

    for value in values {
        buckets[bucket_index(*value, &edges, width)].count += 1;
    }

    buckets
}

/// Bin `(x, y)` pairs into an `nx` by `ny` grid over their observed ranges.
pub fn density_grid(pairs: &[(f64, f64)], nx: usize, ny: usize) -> DensityGrid {
    let xs: Vec<f64> = pairs.iter().map(|(x, _)| *x).collect();
    let ys: Vec<f64> = pairs.iter().map(|(_, y)| *y).collect();

    let (Some(x_range), Some(y_range)) = (value_range(&xs), value_range(&ys)) else {
        return DensityGrid::default();
    };
    if nx == 0 || ny == 0 {
        return DensityGrid::default();
    }

    let x_width = (x_range.1 - x_range.0) / nx as f64;
    let y_width = (y_range.1 - y_range.0) / ny as f64;
    let x_edges = lower_edges(x_range.0, x_width, nx);
    let y_edges = lower_edges(y_range.0, y_width, ny);
    let mut counts = vec![vec![0usize; nx]; ny];

    for (x, y) in pairs {
        let col = bucket_index(*x, &x_edges, x_width);
        let row = bucket_index(*y, &y_edges, y_width);
        counts[row][col] += 1;
    }

    DensityGrid {
        x_range,
        y_range,
        counts,
    }
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Lower edge of each of `bins` equal-width buckets starting at `min`.
fn lower_edges(min: f64, width: f64, bins: usize) -> Vec<f64> {
    (0..bins).map(|i| min + width * i as f64).collect()
}

/// Index of the bucket whose stored bounds contain `value`.
///
/// The division only gives a first guess; the result is settled against
/// `edges` so a value sitting on an edge lands in the bucket that starts there.
fn bucket_index(value: f64, edges: &[f64], width: f64) -> usize {
    let last = edges.len() - 1;
    if width <= 0.0 {
        return 0;
    }

    let guess = ((value - edges[0]) / width).floor();
    let mut idx = if guess < 0.0 {
        0
    } else {
        (guess as usize).min(last)
    };

    while idx > 0 && value < edges[idx] {
        idx -= 1;
    }
    while idx < last && value >= edges[idx + 1] {
        idx += 1;
    }

    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::RecordGenerator;
    use crate::models::{Department, Status};
    use proptest::prelude::*;

    fn create_test_record(
        id: u32,
        department: Department,
        hours: f64,
        status: Status,
    ) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: id,
            department,
            hours_worked: hours,
            productivity_pct: 60.0 + hours,
            status,
        }
    }

    fn sample_dataset() -> Vec<EmployeeRecord> {
        vec![
            create_test_record(3, Department::Sales, 6.0, Status::Active),
            create_test_record(1, Department::Engineering, 8.0, Status::Idle),
            create_test_record(2, Department::Engineering, 6.0, Status::Active),
            create_test_record(4, Department::Hr, 5.0, Status::OnBreak),
        ]
    }

    #[test]
    fn test_grouped_mean() {
        let means = grouped_mean(&sample_dataset(), |r| r.department, |r| r.hours_worked);

        assert_eq!(means.len(), 3);
        assert_eq!(means.get(&Department::Engineering), Some(&7.0));
        assert_eq!(means.get(&Department::Sales), Some(&6.0));
        assert_eq!(means.get(&Department::Hr), Some(&5.0));
        assert_eq!(means.get(&Department::Product), None);
    }

    #[test]
    fn test_grouped_sum_by_employee_is_identity() {
        let sums = grouped_sum(&sample_dataset(), |r| r.employee_id, |r| r.hours_worked);

        assert_eq!(sums.len(), 4);
        assert_eq!(sums.get(&1), Some(&8.0));
        assert_eq!(sums.get(&4), Some(&5.0));
    }

    #[test]
    fn test_count_by_status() {
        let counts = count_by(&sample_dataset(), |r| r.status);

        assert_eq!(counts.get(&Status::Active), Some(&2));
        assert_eq!(counts.get(&Status::Idle), Some(&1));
        assert_eq!(counts.get(&Status::OnBreak), Some(&1));
    }

    #[test]
    fn test_productivity_view_sorted_by_id() {
        let views = aggregate(&sample_dataset());
        let ids: Vec<u32> = views.productivity_by_employee.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_pass_through_views_keep_pairing() {
        let dataset = sample_dataset();
        let views = aggregate(&dataset);

        assert_eq!(views.hours_by_department.len(), dataset.len());
        for (record, (department, hours)) in dataset.iter().zip(&views.hours_by_department) {
            assert_eq!(record.department, *department);
            assert_eq!(record.hours_worked, *hours);
        }

        for (record, point) in dataset.iter().zip(&views.hours_vs_productivity) {
            assert_eq!(record.hours_worked, point.hours_worked);
            assert_eq!(record.productivity_pct, point.productivity_pct);
            assert_eq!(record.department, point.department);
        }
    }

    #[test]
    fn test_histogram_buckets() {
        let buckets = histogram(&[5.0, 5.5, 6.0, 9.0], 4);

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].lower, 5.0);
        assert_eq!(buckets[3].upper, 9.0);
        // 5.0 and 5.5 in the first bucket, 6.0 in the second, 9.0 in the last.
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[2].count, 0);
        assert_eq!(buckets[3].count, 1);
    }

    #[test]
    fn test_histogram_single_value() {
        let buckets = histogram(&[7.0, 7.0, 7.0], 10);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 3);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
    }

    /// Count of `values` inside each bucket's own `[lower, upper)` bounds.
    fn counts_by_bounds(buckets: &[HistogramBucket], values: &[f64]) -> Vec<usize> {
        let last = buckets.len() - 1;
        buckets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let inside = |v: f64| v >= b.lower && (v < b.upper || (i == last && v <= b.upper));
                values.iter().filter(|v| inside(**v)).count()
            })
            .collect()
    }

    #[test]
    fn test_histogram_edge_values_follow_bounds() {
        // 5.8 sits exactly on the lower edge of the third bucket.
        let values = [5.0, 5.8, 9.0];
        let buckets = histogram(&values, 10);

        assert_eq!(buckets[1].count, 0);
        assert_eq!(buckets[2].count, 1);
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, counts_by_bounds(&buckets, &values));
    }

    #[test]
    fn test_histogram_generator_edges() {
        let values: Vec<f64> = (0..=40).map(|i| 5.0 + f64::from(i) / 10.0).collect();
        let buckets = histogram(&values, 10);

        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, counts_by_bounds(&buckets, &values));
        assert_eq!(counts.iter().sum::<usize>(), values.len());
    }

    #[test]
    fn test_density_grid_edge_values() {
        let grid = density_grid(&[(5.0, 60.0), (5.8, 68.0), (9.0, 100.0)], 10, 10);

        assert_eq!(grid.counts[0][0], 1);
        assert_eq!(grid.counts[2][2], 1);
        assert_eq!(grid.counts[9][9], 1);
        assert_eq!(grid.counts[1][1], 0);
    }

    #[test]
    fn test_density_grid() {
        let grid = density_grid(&[(0.0, 0.0), (1.0, 1.0), (1.0, 1.0), (0.1, 0.9)], 2, 2);

        assert_eq!(grid.counts.len(), 2);
        assert_eq!(grid.counts[0][0], 1);
        assert_eq!(grid.counts[1][1], 2);
        assert_eq!(grid.counts[1][0], 1);
        assert_eq!(grid.max_count(), 2);

        let total: usize = grid.counts.iter().flatten().sum();
        assert_eq!(total, 4);

        assert!(density_grid(&[], 5, 5).is_empty());
    }

    #[test]
    fn test_empty_dataset_gives_empty_views() {
        let views = aggregate(&[]);

        assert!(views.avg_hours_by_department.is_empty());
        assert!(views.status_counts.is_empty());
        assert!(views.productivity_by_employee.is_empty());
        assert!(views.hours_vs_productivity.is_empty());
        assert!(views.hours_distribution.is_empty());
        assert!(views.hours_by_department.is_empty());
        assert!(views.total_hours_by_employee.is_empty());
        assert!(views.avg_productivity_by_department.is_empty());
        assert!(views.hours_productivity_pairs.is_empty());
    }

    #[test]
    fn test_seeded_end_to_end() {
        let dataset = RecordGenerator::seeded(2024).generate();
        let views = aggregate(&dataset);

        let present: std::collections::BTreeSet<Department> =
            dataset.iter().map(|r| r.department).collect();
        let grouped: std::collections::BTreeSet<Department> =
            views.avg_hours_by_department.keys().copied().collect();
        assert_eq!(present, grouped);

        assert_eq!(views.productivity_by_employee.len(), 50);
        assert!(views
            .productivity_by_employee
            .windows(2)
            .all(|w| w[0].0 < w[1].0));

        let bucketed: usize = views.hours_distribution.iter().map(|b| b.count).sum();
        assert_eq!(bucketed, 50);
    }

    #[test]
    fn test_aggregate_is_pure() {
        let dataset = RecordGenerator::seeded(5).generate();
        assert_eq!(aggregate(&dataset), aggregate(&dataset));
    }

    proptest! {
        #[test]
        fn prop_grouped_mean_preserves_total(seed in any::<u64>()) {
            let dataset = RecordGenerator::seeded(seed).generate();
            let means = grouped_mean(&dataset, |r| r.department, |r| r.hours_worked);
            let counts = count_by(&dataset, |r| r.department);

            let reconstructed: f64 = means
                .iter()
                .map(|(dept, mean)| mean * counts[dept] as f64)
                .sum();
            let total: f64 = dataset.iter().map(|r| r.hours_worked).sum();

            prop_assert!((reconstructed - total).abs() < 1e-9 * total.max(1.0));
        }

        #[test]
        fn prop_histogram_counts_every_value(
            values in proptest::collection::vec(0.0f64..100.0, 0..200),
            bins in 1usize..30,
        ) {
            let buckets = histogram(&values, bins);
            let counted: usize = buckets.iter().map(|b| b.count).sum();
            prop_assert_eq!(counted, values.len());
        }

        #[test]
        fn prop_histogram_counts_match_bounds(
            cents in proptest::collection::vec(500u32..=900, 1..100),
            bins in 1usize..20,
        ) {
            let values: Vec<f64> = cents.iter().map(|c| f64::from(*c) / 100.0).collect();
            let buckets = histogram(&values, bins);
            if buckets.len() > 1 {
                let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
                prop_assert_eq!(counts, counts_by_bounds(&buckets, &values));
            }
        }
    }
}
