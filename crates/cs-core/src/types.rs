//! Common data types for CutStat.

use serde::{Deserialize, Serialize};

/// A point estimate with two-sided confidence bounds.
///
/// For proportion estimates the bounds always lie in `[0, 1]`. The central
/// value is `NaN` when the estimate is undefined (zero trials); the bounds
/// then degenerate to the full `[0, 1]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Central value.
    pub value: f64,

    /// Lower confidence bound.
    pub lower: f64,

    /// Upper confidence bound.
    pub upper: f64,
}

impl Interval {
    /// Create a new interval estimate.
    pub fn new(value: f64, lower: f64, upper: f64) -> Self {
        Self { value, lower, upper }
    }

    /// Half-widths `(value - lower, upper - value)` for error-bar drawing.
    pub fn half_widths(&self) -> (f64, f64) {
        (self.value - self.lower, self.upper - self.value)
    }

    /// True when the central value is undefined (zero-trial sentinel).
    pub fn is_degenerate(&self) -> bool {
        self.value.is_nan()
    }
}
