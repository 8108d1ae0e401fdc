//! The dashboard pipeline: generate, then aggregate.
//!
//! A `DashboardPipeline` is built once at startup and handed to the
//! refresh loop. It owns the randomness source and a cycle counter;
//! datasets and views are never kept between cycles.

use crate::analysis::{aggregate_with, AggregateOptions};
use crate::generator::RecordGenerator;
use crate::models::{Snapshot, SnapshotMetadata};
use crate::report::{ChartDescriptor, DASHBOARD_LAYOUT};
use chrono::Utc;
use tracing::debug;

/// Runs one generate-and-aggregate cycle on demand.
#[derive(Debug)]
pub struct DashboardPipeline {
    generator: RecordGenerator,
    options: AggregateOptions,
    layout: Vec<ChartDescriptor>,
    include_dataset: bool,
    cycle: u64,
}

impl DashboardPipeline {
    /// Create a pipeline with the standard nine-chart layout.
    pub fn new(generator: RecordGenerator, options: AggregateOptions) -> Self {
        Self {
            generator,
            options,
            layout: DASHBOARD_LAYOUT.to_vec(),
            include_dataset: false,
            cycle: 0,
        }
    }

    /// Replace the chart layout.
    #[allow(dead_code)] // Builder utility for custom dashboards
    pub fn with_layout(mut self, layout: Vec<ChartDescriptor>) -> Self {
        self.layout = layout;
        self
    }

    /// Keep the raw dataset in each snapshot.
    pub fn with_dataset(mut self, include: bool) -> Self {
        self.include_dataset = include;
        self
    }

    /// The chart layout this pipeline feeds.
    pub fn layout(&self) -> &[ChartDescriptor] {
        &self.layout
    }

    /// Number of cycles run so far.
    pub fn cycles_run(&self) -> u64 {
        self.cycle
    }

    /// Generate a fresh dataset and derive all views from it.
    pub fn run_cycle(&mut self) -> Snapshot {
        self.cycle += 1;

        let dataset = self.generator.generate();
        let views = aggregate_with(&dataset, &self.options);

        debug!(
            cycle = self.cycle,
            records = dataset.len(),
            "Derived {} charts worth of views",
            self.layout.len()
        );

        Snapshot {
            metadata: SnapshotMetadata {
                cycle: self.cycle,
                generated_at: Utc::now(),
                record_count: dataset.len(),
                seed: self.generator.seed(),
            },
            views,
            dataset: self.include_dataset.then_some(dataset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::generator::generate_dataset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_pipeline(seed: u64) -> DashboardPipeline {
        DashboardPipeline::new(RecordGenerator::seeded(seed), AggregateOptions::default())
    }

    #[test]
    fn test_run_cycle_counts_cycles() {
        let mut pipeline = seeded_pipeline(1);

        assert_eq!(pipeline.run_cycle().metadata.cycle, 1);
        assert_eq!(pipeline.run_cycle().metadata.cycle, 2);
        assert_eq!(pipeline.cycles_run(), 2);
    }

    #[test]
    fn test_cycles_do_not_reuse_views() {
        let mut pipeline = seeded_pipeline(1);

        let first = pipeline.run_cycle();
        let second = pipeline.run_cycle();
        assert_ne!(first.views, second.views);
    }

    #[test]
    fn test_views_match_direct_aggregation() {
        let mut pipeline = seeded_pipeline(8).with_dataset(true);
        let snapshot = pipeline.run_cycle();

        let expected = generate_dataset(&mut StdRng::seed_from_u64(8));
        assert_eq!(snapshot.dataset.as_ref(), Some(&expected));
        assert_eq!(snapshot.views, aggregate(&expected));
        assert_eq!(snapshot.metadata.record_count, 50);
        assert_eq!(snapshot.metadata.seed, Some(8));
    }

    #[test]
    fn test_dataset_dropped_by_default() {
        let mut pipeline = seeded_pipeline(8);
        assert!(pipeline.run_cycle().dataset.is_none());
    }

    #[test]
    fn test_histogram_bins_option() {
        let options = AggregateOptions { histogram_bins: 4 };
        let mut pipeline = DashboardPipeline::new(RecordGenerator::seeded(8), options);
        assert_eq!(pipeline.run_cycle().views.hours_distribution.len(), 4);
    }

    #[test]
    fn test_custom_layout() {
        let pipeline = seeded_pipeline(8).with_layout(DASHBOARD_LAYOUT[..2].to_vec());
        assert_eq!(pipeline.layout().len(), 2);
    }
}
