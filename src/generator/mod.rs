//! Synthetic employee record generation.
//!
//! This module produces a fresh dataset of `EMPLOYEE_COUNT` records
//! from an injected randomness source. Every call draws a brand new
//! table; nothing is carried over from previous calls.

use crate::error::DashboardError;
use crate::models::{
    round_to_cents, Dataset, Department, EmployeeRecord, Status, EMPLOYEE_COUNT, HOURS_RANGE,
    PRODUCTIVITY_RANGE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Generates employee datasets from an owned randomness source.
#[derive(Debug, Clone)]
pub struct RecordGenerator {
    rng: StdRng,
    seed: Option<u64>,
}

impl RecordGenerator {
    /// Create a generator with a reproducible seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a generator seeded from operating-system entropy.
    pub fn from_entropy() -> Result<Self, DashboardError> {
        let rng =
            StdRng::try_from_os_rng().map_err(|e| DashboardError::Entropy(e.to_string()))?;

        Ok(Self { rng, seed: None })
    }

    /// Create a generator from an optional seed, falling back to entropy.
    pub fn new(seed: Option<u64>) -> Result<Self, DashboardError> {
        match seed {
            Some(seed) => Ok(Self::seeded(seed)),
            None => Self::from_entropy(),
        }
    }

    /// The seed this generator was built with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Draw a new dataset.
    pub fn generate(&mut self) -> Dataset {
        let dataset = generate_dataset(&mut self.rng);
        debug!("Generated {} employee records", dataset.len());
        dataset
    }
}

/// Draw one dataset of `EMPLOYEE_COUNT` records from `rng`.
///
/// Ids run from 1 to `EMPLOYEE_COUNT` in order. Department and status
/// are uniform over their variants; both numeric fields are uniform over
/// their closed ranges and rounded to two decimals.
pub fn generate_dataset<R: Rng + ?Sized>(rng: &mut R) -> Dataset {
    (1..=EMPLOYEE_COUNT)
        .map(|employee_id| generate_record(rng, employee_id))
        .collect()
}

fn generate_record<R: Rng + ?Sized>(rng: &mut R, employee_id: u32) -> EmployeeRecord {
    let department = Department::ALL[rng.random_range(0..Department::ALL.len())];
    let hours_worked = rng.random_range(HOURS_RANGE.0..=HOURS_RANGE.1);
    let productivity_pct = rng.random_range(PRODUCTIVITY_RANGE.0..=PRODUCTIVITY_RANGE.1);
    let status = Status::ALL[rng.random_range(0..Status::ALL.len())];

    EmployeeRecord {
        employee_id,
        department,
        hours_worked: round_to_cents(hours_worked),
        productivity_pct: round_to_cents(productivity_pct),
        status,
    }
}
