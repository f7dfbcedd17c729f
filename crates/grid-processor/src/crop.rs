//! Cutting fixed-size windows out of surface maps.

use netcdf_parser::{MapKind, SurfaceMap};
use ocean_common::normalize_longitude;
use serde::{Deserialize, Serialize};

use crate::error::{GridProcessorError, Result};

/// Window settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Edge length of the square window in grid cells.
    pub window_size: usize,
    /// Value substituted for missing cells. Without it, windows containing
    /// missing cells are rejected.
    pub missing_fill: Option<f32>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            window_size: 17,
            missing_fill: None,
        }
    }
}

impl CropConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(GridProcessorError::config("window_size must be > 0"));
        }
        if let Some(fill) = self.missing_fill {
            if !fill.is_finite() {
                return Err(GridProcessorError::config("missing_fill must be finite"));
            }
        }
        Ok(())
    }
}

/// A square window of one surface variable, row-major with latitude
/// ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceWindow {
    pub kind: MapKind,
    pub size: usize,
    pub values: Vec<f32>,
}

impl SurfaceWindow {
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.size + col]
    }

    /// Value at the window centre.
    pub fn center(&self) -> f32 {
        self.get(self.size / 2, self.size / 2)
    }
}

/// Extracts windows centred on the grid node nearest to a location.
///
/// For an even window size the extra row and column fall on the high side
/// of the centre.
#[derive(Debug, Clone, Default)]
pub struct MapCropper {
    config: CropConfig,
}

impl MapCropper {
    pub fn new(config: CropConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Crop the window around `(lat, lon)`.
    ///
    /// Longitude may be given in either convention. Fails with
    /// [`GridProcessorError::OutOfBounds`] if the location lies off the map
    /// or the window would cross a latitude edge or the longitude edge of a
    /// regional map. Full-globe maps wrap around in longitude.
    pub fn crop(&self, map: &SurfaceMap, lat: f64, lon: f64) -> Result<SurfaceWindow> {
        let size = self.config.window_size;
        let half = (size / 2) as isize;
        let global = map.is_global_lon();

        let lat_idx = axis_index(&map.lats, lat, map.lat_step()).ok_or_else(|| {
            GridProcessorError::out_of_bounds(format!("lat {}", lat), lat_extent(map))
        })?;

        let lon = normalize_longitude(lon, map.lon_convention());
        let lon_idx = if global {
            wrapped_nearest(&map.lons, lon)
        } else {
            axis_index(&map.lons, lon, map.lon_step()).ok_or_else(|| {
                GridProcessorError::out_of_bounds(format!("lon {}", lon), lon_extent(map))
            })?
        };

        let row0 = lat_idx as isize - half;
        let row_end = row0 + size as isize;
        if row0 < 0 || row_end > map.nlat() as isize {
            return Err(GridProcessorError::out_of_bounds(
                format!("rows {}..{} around lat {}", row0, row_end, lat),
                format!("0..{} ({})", map.nlat(), lat_extent(map)),
            ));
        }

        let col0 = lon_idx as isize - half;
        let col_end = col0 + size as isize;
        let nlon = map.nlon() as isize;
        if global {
            if size > map.nlon() {
                return Err(GridProcessorError::out_of_bounds(
                    format!("{} columns", size),
                    format!("0..{} ({})", nlon, lon_extent(map)),
                ));
            }
        } else if col0 < 0 || col_end > nlon {
            return Err(GridProcessorError::out_of_bounds(
                format!("columns {}..{} around lon {}", col0, col_end, lon),
                format!("0..{} ({})", nlon, lon_extent(map)),
            ));
        }

        let mut values = Vec::with_capacity(size * size);
        for row in row0..row_end {
            for col in col0..col_end {
                let col = col.rem_euclid(nlon) as usize;
                values.push(map.get(row as usize, col));
            }
        }

        let missing = values.iter().filter(|v| v.is_nan()).count();
        if missing > 0 {
            match self.config.missing_fill {
                Some(fill) => {
                    for v in values.iter_mut().filter(|v| v.is_nan()) {
                        *v = fill;
                    }
                }
                None => {
                    return Err(GridProcessorError::MissingValues {
                        kind: map.kind,
                        count: missing,
                    })
                }
            }
        }

        Ok(SurfaceWindow {
            kind: map.kind,
            size,
            values,
        })
    }
}

/// Index of the node nearest to `value` on an ascending axis.
pub fn nearest_index(axis: &[f64], value: f64) -> usize {
    let upper = axis.partition_point(|&a| a < value);
    if upper == 0 {
        return 0;
    }
    if upper == axis.len() {
        return axis.len() - 1;
    }
    // Ties go to the lower node
    if value - axis[upper - 1] <= axis[upper] - value {
        upper - 1
    } else {
        upper
    }
}

/// Nearest node, or `None` if `value` lies more than half a cell beyond
/// either end of the axis.
fn axis_index(axis: &[f64], value: f64, step: f64) -> Option<usize> {
    let margin = step.abs() / 2.0 + 1e-9;
    let (lo, hi) = (axis[0], axis[axis.len() - 1]);
    if !value.is_finite() || value < lo - margin || value > hi + margin {
        return None;
    }
    Some(nearest_index(axis, value))
}

/// Nearest node on a longitude axis that wraps at 360°.
fn wrapped_nearest(axis: &[f64], value: f64) -> usize {
    let last = axis.len() - 1;
    let idx = nearest_index(axis, value);
    if value < axis[0] {
        let across = value - (axis[last] - 360.0);
        if across < axis[0] - value {
            return last;
        }
    } else if value > axis[last] {
        let across = axis[0] + 360.0 - value;
        if across < value - axis[last] {
            return 0;
        }
    }
    idx
}

fn lat_extent(map: &SurfaceMap) -> String {
    format!("lat {}..{}", map.lats[0], map.lats[map.nlat() - 1])
}

fn lon_extent(map: &SurfaceMap) -> String {
    format!("lon {}..{}", map.lons[0], map.lons[map.nlon() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_index() {
        let axis = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(nearest_index(&axis, -5.0), 0);
        assert_eq!(nearest_index(&axis, 0.4), 0);
        assert_eq!(nearest_index(&axis, 0.5), 0);
        assert_eq!(nearest_index(&axis, 0.6), 1);
        assert_eq!(nearest_index(&axis, 2.0), 2);
        assert_eq!(nearest_index(&axis, 9.0), 3);
    }

    #[test]
    fn test_wrapped_nearest() {
        let axis: Vec<f64> = (0..360).map(|i| 0.5 + i as f64).collect();
        assert_eq!(wrapped_nearest(&axis, 0.1), 0);
        assert_eq!(wrapped_nearest(&axis, 359.9), 359);
        // 0.0 is equidistant from 0.5 and 359.5; the in-range node wins
        assert_eq!(wrapped_nearest(&axis, 0.0), 0);
    }

    #[test]
    fn test_axis_index_margin() {
        let axis = [10.0, 11.0, 12.0];
        assert_eq!(axis_index(&axis, 9.6, 1.0), Some(0));
        assert_eq!(axis_index(&axis, 12.5, 1.0), Some(2));
        assert_eq!(axis_index(&axis, 9.4, 1.0), None);
        assert_eq!(axis_index(&axis, f64::NAN, 1.0), None);
    }

    #[test]
    fn test_config_validation() {
        assert!(CropConfig::default().validate().is_ok());
        assert!(CropConfig {
            window_size: 0,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(CropConfig {
            missing_fill: Some(f32::NAN),
            ..Default::default()
        }
        .validate()
        .is_err());
    }
}
