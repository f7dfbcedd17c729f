//! Grid snapping and the spatiotemporal key attached to each profile.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::elapsed_days;

/// Longitude convention used by the region box and by the surface maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongitudeConvention {
    /// Longitudes in `[0, 360)`.
    #[default]
    #[serde(alias = "0-360", alias = "east")]
    ZeroTo360,
    /// Longitudes in `[-180, 180)`.
    #[serde(alias = "-180-180", alias = "signed")]
    PlusMinus180,
}

impl LongitudeConvention {
    /// Guess the convention from the longitude span of a grid.
    ///
    /// A grid living entirely in `[0, 180]` is reported as `ZeroTo360`;
    /// both conventions agree on that range.
    pub fn detect(min_lon: f64) -> Self {
        if min_lon < 0.0 {
            Self::PlusMinus180
        } else {
            Self::ZeroTo360
        }
    }

    /// Inclusive longitude bounds of the convention.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Self::ZeroTo360 => (0.0, 360.0),
            Self::PlusMinus180 => (-180.0, 180.0),
        }
    }
}

impl std::fmt::Display for LongitudeConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTo360 => write!(f, "0..360"),
            Self::PlusMinus180 => write!(f, "-180..180"),
        }
    }
}

/// Bring a longitude into the given convention.
pub fn normalize_longitude(lon: f64, convention: LongitudeConvention) -> f64 {
    match convention {
        LongitudeConvention::ZeroTo360 => lon.rem_euclid(360.0),
        LongitudeConvention::PlusMinus180 => (lon + 180.0).rem_euclid(360.0) - 180.0,
    }
}

/// Round `value` to the nearest multiple of `resolution`.
///
/// Ties are resolved with round-half-to-even on the quotient
/// `value / resolution`, so `0.125` snaps to `0.0` and `0.375` snaps to `0.5`
/// on a 0.25° grid. The quotient is evaluated in floating point: values that
/// are not exactly representable (e.g. `0.15 / 0.1`) are not ties.
///
/// `resolution` must be positive and finite; configuration validation
/// enforces this before any snapping happens.
pub fn snap_to_grid(value: f64, resolution: f64) -> f64 {
    debug_assert!(resolution > 0.0 && resolution.is_finite());
    // `+ 0.0` folds negative zero into positive zero
    (value / resolution).round_ties_even() * resolution + 0.0
}

/// Spatiotemporal key correlating a profile to its surface context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Whole days elapsed since the configured epoch.
    pub day_index: i64,
    /// Latitude snapped to the grid resolution.
    pub grid_lat: f64,
    /// Longitude snapped to the grid resolution, in the configured convention.
    pub grid_lon: f64,
}

impl GridCell {
    /// Derive the cell for an observation.
    pub fn from_observation(
        date: NaiveDate,
        lat: f64,
        lon: f64,
        epoch: NaiveDate,
        resolution: f64,
        convention: LongitudeConvention,
    ) -> Self {
        let lon = normalize_longitude(lon, convention);
        // Snapping 359.9 on a 0.25° grid lands on 360.0, fold it back.
        let grid_lon = normalize_longitude(snap_to_grid(lon, resolution), convention);

        Self {
            day_index: elapsed_days(date, epoch),
            grid_lat: snap_to_grid(lat, resolution),
            grid_lon,
        }
    }

    /// The `[day_index, grid_lat, grid_lon]` row used as model input.
    pub fn to_row(&self) -> [f32; 3] {
        [self.day_index as f32, self.grid_lat as f32, self.grid_lon as f32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_basic() {
        assert_eq!(snap_to_grid(10.2, 0.25), 10.25);
        assert_eq!(snap_to_grid(140.7, 0.25), 140.75);
        assert_eq!(snap_to_grid(-3.1, 1.0), -3.0);
    }

    #[test]
    fn test_snap_ties_to_even() {
        assert_eq!(snap_to_grid(0.125, 0.25), 0.0);
        assert_eq!(snap_to_grid(0.375, 0.25), 0.5);
        assert_eq!(snap_to_grid(2.5, 1.0), 2.0);
        assert_eq!(snap_to_grid(3.5, 1.0), 4.0);
        assert_eq!(snap_to_grid(-2.5, 1.0), -2.0);
    }

    #[test]
    fn test_snap_idempotent() {
        for &res in &[0.1, 0.25, 0.5, 1.0, 1.0 / 12.0] {
            for i in -2000..2000 {
                let x = i as f64 * 0.0731;
                let once = snap_to_grid(x, res);
                assert_eq!(snap_to_grid(once, res), once, "x={} res={}", x, res);
            }
        }
    }

    #[test]
    fn test_snap_no_negative_zero() {
        let snapped = snap_to_grid(-0.1, 0.25);
        assert_eq!(snapped, 0.0);
        assert!(snapped.is_sign_positive());
    }

    #[test]
    fn test_normalize_longitude() {
        use LongitudeConvention::*;
        assert_eq!(normalize_longitude(-20.0, ZeroTo360), 340.0);
        assert_eq!(normalize_longitude(360.0, ZeroTo360), 0.0);
        assert_eq!(normalize_longitude(200.0, PlusMinus180), -160.0);
        assert_eq!(normalize_longitude(180.0, PlusMinus180), -180.0);
        assert_eq!(normalize_longitude(-45.0, PlusMinus180), -45.0);
    }

    #[test]
    fn test_grid_cell_wraps_seam() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
        let epoch = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let cell = GridCell::from_observation(
            date,
            10.2,
            359.9,
            epoch,
            0.25,
            LongitudeConvention::ZeroTo360,
        );
        assert_eq!(cell.day_index, 14);
        assert_eq!(cell.grid_lat, 10.25);
        assert_eq!(cell.grid_lon, 0.0);
    }

    #[test]
    fn test_grid_cell_signed_input() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
        let cell = GridCell::from_observation(
            date,
            -30.0,
            -60.1,
            date,
            0.25,
            LongitudeConvention::ZeroTo360,
        );
        assert_eq!(cell.day_index, 0);
        assert_eq!(cell.grid_lon, 300.0);
    }
}
