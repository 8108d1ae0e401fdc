//! Domain errors for the dashboard pipeline.

use crate::report::ChartKind;
use thiserror::Error;

/// Errors raised by generation, rendering, and option validation.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The operating-system randomness source could not be read.
    #[error("randomness source unavailable: {0}")]
    Entropy(String),

    /// A chart kind was handed data of the wrong shape.
    #[error("cannot render {kind} chart from {data} data")]
    ChartMismatch {
        kind: ChartKind,
        data: &'static str,
    },

    /// The chart backend failed while drawing.
    #[error("failed to draw {kind} chart: {reason}")]
    Draw { kind: ChartKind, reason: String },

    /// Options failed validation.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DashboardError::ChartMismatch {
            kind: ChartKind::Pie,
            data: "points",
        };
        assert_eq!(err.to_string(), "cannot render pie chart from points data");

        let err = DashboardError::Draw {
            kind: ChartKind::Heatmap,
            reason: "backend closed".to_string(),
        };
        assert_eq!(err.to_string(), "failed to draw heatmap chart: backend closed");

        let err = DashboardError::Entropy("no device".to_string());
        assert!(err.to_string().contains("no device"));
    }
}
