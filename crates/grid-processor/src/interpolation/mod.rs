//! Resampling of irregular profiles onto a fixed pressure grid.

pub mod akima;
pub mod grid;

use serde::{Deserialize, Serialize};

use crate::error::{GridProcessorError, Result};

pub use akima::AkimaSpline;
pub use grid::PressureGrid;

/// Interpolation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Shallowest target level (dbar).
    pub min_pressure: f64,
    /// Deepest target level (dbar).
    pub max_pressure: f64,
    /// Spacing between target levels (dbar).
    pub pressure_interval: f64,
    /// Profiles with fewer samples are rejected. Never below 2.
    pub min_samples: usize,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            min_pressure: 10.0,
            max_pressure: 1000.0,
            pressure_interval: 10.0,
            min_samples: 3,
        }
    }
}

impl InterpolationConfig {
    pub fn grid(&self) -> PressureGrid {
        PressureGrid {
            min: self.min_pressure,
            max: self.max_pressure,
            interval: self.pressure_interval,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_samples < 2 {
            return Err(GridProcessorError::config(format!(
                "min_samples must be >= 2, got {}",
                self.min_samples
            )));
        }
        self.grid().validate()
    }
}

/// Salinity and temperature on the target pressure grid.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedProfile {
    pub salinity: Vec<f64>,
    pub temperature: Vec<f64>,
}

impl InterpolatedProfile {
    /// Number of grid points that could not be interpolated.
    pub fn nan_count(&self) -> usize {
        self.salinity
            .iter()
            .chain(&self.temperature)
            .filter(|v| v.is_nan())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.nan_count() == 0
    }
}

/// Interpolate one profile's salinity and temperature onto the grid.
///
/// Levels outside the sampled pressure range come back as `NaN`; callers
/// decide whether a partially covered profile is usable.
pub fn interpolate_profile(
    pressure: &[f64],
    salinity: &[f64],
    temperature: &[f64],
    config: &InterpolationConfig,
) -> Result<InterpolatedProfile> {
    let required = config.min_samples.max(2);
    if pressure.len() < required {
        return Err(GridProcessorError::InsufficientSamples {
            found: pressure.len(),
            required,
        });
    }

    let levels = config.grid().levels();
    let salinity = AkimaSpline::new(pressure, salinity)?.evaluate_many(&levels);
    let temperature = AkimaSpline::new(pressure, temperature)?.evaluate_many(&levels);

    Ok(InterpolatedProfile {
        salinity,
        temperature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coarse() -> InterpolationConfig {
        InterpolationConfig {
            min_pressure: 0.0,
            max_pressure: 1000.0,
            pressure_interval: 500.0,
            min_samples: 3,
        }
    }

    #[test]
    fn test_reference_profile() {
        let profile = interpolate_profile(
            &[0.0, 500.0, 1000.0],
            &[35.0, 34.5, 34.0],
            &[20.0, 10.0, 4.0],
            &coarse(),
        )
        .unwrap();

        assert_eq!(profile.salinity, vec![35.0, 34.5, 34.0]);
        assert_eq!(profile.temperature, vec![20.0, 10.0, 4.0]);
        assert!(profile.is_complete());
    }

    #[test]
    fn test_partial_coverage_yields_nan() {
        let profile = interpolate_profile(
            &[100.0, 500.0, 1000.0],
            &[35.0, 34.5, 34.0],
            &[20.0, 10.0, 4.0],
            &coarse(),
        )
        .unwrap();

        assert!(profile.salinity[0].is_nan());
        assert_eq!(profile.nan_count(), 2);
        assert!(!profile.is_complete());
    }

    #[test]
    fn test_min_samples_enforced() {
        let err = interpolate_profile(&[0.0, 1000.0], &[35.0, 34.0], &[20.0, 4.0], &coarse())
            .unwrap_err();
        assert!(matches!(
            err,
            GridProcessorError::InsufficientSamples {
                found: 2,
                required: 3
            }
        ));

        let two = InterpolationConfig {
            min_samples: 2,
            ..coarse()
        };
        let profile = interpolate_profile(&[0.0, 1000.0], &[35.0, 34.0], &[20.0, 4.0], &two).unwrap();
        assert!((profile.salinity[1] - 34.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_monotonic_pressure() {
        let err = interpolate_profile(
            &[0.0, 600.0, 500.0, 1000.0],
            &[35.0, 34.6, 34.5, 34.0],
            &[20.0, 9.0, 10.0, 4.0],
            &coarse(),
        )
        .unwrap_err();
        assert!(matches!(err, GridProcessorError::NonMonotonicPressure { index: 2 }));
    }

    #[test]
    fn test_config_validation() {
        assert!(InterpolationConfig::default().validate().is_ok());
        let bad = InterpolationConfig {
            min_samples: 1,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
