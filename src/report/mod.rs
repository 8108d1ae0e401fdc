//! Dashboard rendering.
//!
//! The chart layout decides which view becomes which chart, the SVG
//! renderer draws one chart at a time, and the generator assembles the
//! page.

pub mod generator;
pub mod layout;
pub mod svg;

pub use generator::{generate_dashboard_html, generate_json_snapshot, PageOptions};
pub use layout::{ChartDescriptor, ChartKind, DASHBOARD_LAYOUT};
pub use svg::{ChartRenderer, SvgRenderer};
