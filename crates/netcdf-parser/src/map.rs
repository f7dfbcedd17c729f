//! In-memory representation of one decoded surface map.

use ocean_common::LongitudeConvention;
use serde::{Deserialize, Serialize};

use crate::error::{NetCdfError, NetCdfResult};

/// Surface variable carried by a map file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    /// Sea surface height.
    Ssh,
    /// Sea surface temperature.
    Sst,
}

impl MapKind {
    pub const ALL: [MapKind; 2] = [MapKind::Ssh, MapKind::Sst];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapKind::Ssh => "ssh",
            MapKind::Sst => "sst",
        }
    }
}

impl std::fmt::Display for MapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regular lat/lon grid of one surface variable.
///
/// Coordinates are stored ascending and `values` is row-major with latitude
/// as the slow axis: `values[lat_idx * lons.len() + lon_idx]`. Missing cells
/// are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMap {
    pub kind: MapKind,
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    pub values: Vec<f32>,
}

impl SurfaceMap {
    /// Build a map, flipping either axis into ascending order if needed.
    pub fn new(kind: MapKind, lats: Vec<f64>, lons: Vec<f64>, values: Vec<f32>) -> NetCdfResult<Self> {
        if lats.is_empty() || lons.is_empty() {
            return Err(NetCdfError::Shape(
                "map has an empty coordinate axis".to_string(),
            ));
        }
        if values.len() != lats.len() * lons.len() {
            return Err(NetCdfError::Shape(format!(
                "{} values for a {}x{} grid",
                values.len(),
                lats.len(),
                lons.len()
            )));
        }

        let mut map = Self {
            kind,
            lats,
            lons,
            values,
        };

        if !is_strictly_monotonic(&map.lats) {
            return Err(NetCdfError::Malformed(
                "latitude axis is not monotonic".to_string(),
            ));
        }
        if !is_strictly_monotonic(&map.lons) {
            return Err(NetCdfError::Malformed(
                "longitude axis is not monotonic".to_string(),
            ));
        }

        if map.lats.len() > 1 && map.lats[0] > map.lats[1] {
            map.flip_lat();
        }
        if map.lons.len() > 1 && map.lons[0] > map.lons[1] {
            map.flip_lon();
        }

        Ok(map)
    }

    pub fn nlat(&self) -> usize {
        self.lats.len()
    }

    pub fn nlon(&self) -> usize {
        self.lons.len()
    }

    /// Value at a grid index.
    pub fn get(&self, lat_idx: usize, lon_idx: usize) -> f32 {
        self.values[lat_idx * self.lons.len() + lon_idx]
    }

    /// Mean longitude spacing, or 0 for a single column.
    pub fn lon_step(&self) -> f64 {
        mean_step(&self.lons)
    }

    /// Mean latitude spacing, or 0 for a single row.
    pub fn lat_step(&self) -> f64 {
        mean_step(&self.lats)
    }

    /// Longitude convention the grid coordinates are expressed in.
    pub fn lon_convention(&self) -> LongitudeConvention {
        LongitudeConvention::detect(self.lons[0])
    }

    /// Whether the longitude axis covers the whole globe, so that indices
    /// wrap around at the seam.
    pub fn is_global_lon(&self) -> bool {
        let step = self.lon_step();
        if step <= 0.0 {
            return false;
        }
        let span = self.lons[self.lons.len() - 1] - self.lons[0] + step;
        (span - 360.0).abs() < step * 0.5
    }

    fn flip_lat(&mut self) {
        let nlon = self.lons.len();
        self.lats.reverse();
        let rows: Vec<&[f32]> = self.values.chunks(nlon).rev().collect();
        self.values = rows.concat();
    }

    fn flip_lon(&mut self) {
        let nlon = self.lons.len();
        self.lons.reverse();
        for row in self.values.chunks_mut(nlon) {
            row.reverse();
        }
    }
}

fn is_strictly_monotonic(values: &[f64]) -> bool {
    if values.iter().any(|v| !v.is_finite()) {
        return false;
    }
    values.windows(2).all(|w| w[1] > w[0]) || values.windows(2).all(|w| w[1] < w[0])
}

fn mean_step(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    (values[values.len() - 1] - values[0]) / (values.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(nlat: usize, nlon: usize) -> Vec<f32> {
        (0..nlat * nlon).map(|i| i as f32).collect()
    }

    #[test]
    fn test_shape_checked() {
        let err = SurfaceMap::new(MapKind::Ssh, vec![0.0, 1.0], vec![0.0, 1.0, 2.0], grid(2, 2));
        assert!(matches!(err, Err(NetCdfError::Shape(_))));
    }

    #[test]
    fn test_descending_latitude_flipped() {
        let map = SurfaceMap::new(
            MapKind::Sst,
            vec![1.0, 0.0],
            vec![10.0, 11.0, 12.0],
            vec![3.0, 4.0, 5.0, 0.0, 1.0, 2.0],
        )
        .unwrap();

        assert_eq!(map.lats, vec![0.0, 1.0]);
        assert_eq!(map.values, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(map.get(1, 2), 5.0);
    }

    #[test]
    fn test_descending_longitude_flipped() {
        let map = SurfaceMap::new(
            MapKind::Sst,
            vec![0.0, 1.0],
            vec![12.0, 11.0, 10.0],
            vec![2.0, 1.0, 0.0, 5.0, 4.0, 3.0],
        )
        .unwrap();

        assert_eq!(map.lons, vec![10.0, 11.0, 12.0]);
        assert_eq!(map.values, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_non_monotonic_rejected() {
        let err = SurfaceMap::new(MapKind::Ssh, vec![0.0, 2.0, 1.0], vec![0.0], grid(3, 1));
        assert!(matches!(err, Err(NetCdfError::Malformed(_))));
    }

    #[test]
    fn test_global_detection() {
        let lons: Vec<f64> = (0..1440).map(|i| 0.125 + i as f64 * 0.25).collect();
        let map = SurfaceMap::new(MapKind::Ssh, vec![0.0], lons, vec![0.0; 1440]).unwrap();
        assert!(map.is_global_lon());
        assert_eq!(map.lon_convention(), LongitudeConvention::ZeroTo360);

        let regional = SurfaceMap::new(MapKind::Ssh, vec![0.0], vec![100.0, 101.0], vec![0.0; 2]).unwrap();
        assert!(!regional.is_global_lon());
    }

    #[test]
    fn test_signed_convention_detected() {
        let lons: Vec<f64> = (0..360).map(|i| -179.5 + i as f64).collect();
        let map = SurfaceMap::new(MapKind::Sst, vec![0.0], lons, vec![0.0; 360]).unwrap();
        assert!(map.is_global_lon());
        assert_eq!(map.lon_convention(), LongitudeConvention::PlusMinus180);
    }
}
