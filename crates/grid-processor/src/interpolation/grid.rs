//! Target pressure levels for interpolation.

use serde::{Deserialize, Serialize};

use crate::error::{GridProcessorError, Result};

/// Relative tolerance when checking that the span is a whole number of steps.
const STEP_TOLERANCE: f64 = 1e-9;

/// Evenly spaced pressure levels `min, min + interval, ..., max` (dbar).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureGrid {
    pub min: f64,
    pub max: f64,
    pub interval: f64,
}

impl PressureGrid {
    pub fn new(min: f64, max: f64, interval: f64) -> Result<Self> {
        let grid = Self { min, max, interval };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.interval.is_finite()) {
            return Err(GridProcessorError::config("pressure grid bounds must be finite"));
        }
        if self.interval <= 0.0 {
            return Err(GridProcessorError::config(format!(
                "pressure interval must be > 0, got {}",
                self.interval
            )));
        }
        if self.max < self.min {
            return Err(GridProcessorError::config(format!(
                "max pressure {} is below min pressure {}",
                self.max, self.min
            )));
        }
        let steps = (self.max - self.min) / self.interval;
        if (steps - steps.round()).abs() > STEP_TOLERANCE * steps.max(1.0) {
            return Err(GridProcessorError::config(format!(
                "pressure span {}..{} is not a multiple of {}",
                self.min, self.max, self.interval
            )));
        }
        Ok(())
    }

    /// Number of levels, both ends included.
    pub fn len(&self) -> usize {
        ((self.max - self.min) / self.interval).round() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The pressure levels. Each level is computed from `min` directly so
    /// rounding does not accumulate.
    pub fn levels(&self) -> Vec<f64> {
        let n = self.len();
        (0..n)
            .map(|i| {
                if i + 1 == n {
                    self.max
                } else {
                    self.min + i as f64 * self.interval
                }
            })
            .collect()
    }
}
