//! Geographic bounding boxes used to select profiles by region.

use serde::{Deserialize, Serialize};

use crate::grid::{normalize_longitude, LongitudeConvention};

/// A geographic bounding box in degrees.
///
/// Longitudes are interpreted in whatever convention the caller normalizes
/// to. When `min_lon > max_lon` the box crosses the seam of that convention
/// (e.g. `170..-170` in the ±180 convention) and wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// The whole globe, with longitudes spanning `convention`.
    pub fn globe(convention: LongitudeConvention) -> Self {
        let (min_lon, max_lon) = convention.bounds();
        Self::new(-90.0, 90.0, min_lon, max_lon)
    }

    /// Check latitude ordering and ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.min_lat) || !(-90.0..=90.0).contains(&self.max_lat) {
            return Err(format!(
                "latitude bounds must lie in [-90, 90], got [{}, {}]",
                self.min_lat, self.max_lat
            ));
        }
        if self.min_lat > self.max_lat {
            return Err(format!(
                "min_lat {} is greater than max_lat {}",
                self.min_lat, self.max_lat
            ));
        }
        if !self.min_lon.is_finite() || !self.max_lon.is_finite() {
            return Err("longitude bounds must be finite".to_string());
        }
        Ok(())
    }

    /// Whether the box wraps across the longitude seam.
    pub fn crosses_seam(&self) -> bool {
        self.min_lon > self.max_lon
    }

    /// Check if a point is inside the box (edges inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.min_lat || lat > self.max_lat {
            return false;
        }
        if self.crosses_seam() {
            lon >= self.min_lon || lon <= self.max_lon
        } else {
            lon >= self.min_lon && lon <= self.max_lon
        }
    }

    /// Check a point after bringing its longitude into `convention`.
    ///
    /// The box bounds themselves are taken to already be in `convention`.
    pub fn contains_normalized(&self, lat: f64, lon: f64, convention: LongitudeConvention) -> bool {
        self.contains(lat, normalize_longitude(lon, convention))
    }

    /// Height of the box in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Width of the box in degrees, accounting for seam crossing.
    pub fn width(&self) -> f64 {
        if self.crosses_seam() {
            360.0 - (self.min_lon - self.max_lon)
        } else {
            self.max_lon - self.min_lon
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_globe_keeps_western_hemisphere() {
        let bbox = BoundingBox::globe(LongitudeConvention::PlusMinus180);
        assert!(bbox.contains_normalized(-20.0, -129.3, LongitudeConvention::PlusMinus180));
        assert!(bbox.contains_normalized(-20.0, 230.7, LongitudeConvention::PlusMinus180));
        assert_eq!(bbox.width(), 360.0);
    }

    #[test]
    fn test_contains_edges_inclusive() {
        let bbox = BoundingBox::new(0.0, 10.0, 0.0, 100.0);
        assert!(bbox.contains(0.0, 0.0));
        assert!(bbox.contains(10.0, 100.0));
        assert!(!bbox.contains(10.2, 50.0));
        assert!(!bbox.contains(5.0, 140.7));
    }

    #[test]
    fn test_contains_across_seam() {
        let bbox = BoundingBox::new(-10.0, 10.0, 170.0, -170.0);
        assert!(bbox.crosses_seam());
        assert!(bbox.contains(0.0, 175.0));
        assert!(bbox.contains(0.0, -175.0));
        assert!(!bbox.contains(0.0, 0.0));
        assert!((bbox.width() - 20.0).abs() < 1e-12);
    }
}
