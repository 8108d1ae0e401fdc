//! Analysis modules.
//!
//! Aggregation turns one dataset into the nine dashboard views.

pub mod aggregator;
pub mod views;

pub use aggregator::*;
pub use views::*;
