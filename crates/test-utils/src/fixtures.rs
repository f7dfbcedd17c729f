//! Common test fixtures for ocean preprocessing tests.
//!
//! This module provides pre-defined test data that represents common
//! scenarios in profile and surface map processing.

/// Common region definitions as `(min_lat, max_lat, min_lon, max_lon)`.
pub mod region {
    /// The whole globe in the 0..360 convention
    pub const GLOBAL: (f64, f64, f64, f64) = (-90.0, 90.0, 0.0, 360.0);

    /// Western North Pacific around Japan
    pub const NORTH_PACIFIC: (f64, f64, f64, f64) = (0.0, 60.0, 120.0, 180.0);

    /// Region that excludes the western Pacific (lon 0..100)
    pub const INDIAN_OCEAN: (f64, f64, f64, f64) = (-60.0, 30.0, 0.0, 100.0);

    /// Region crossing the 0° meridian (Atlantic), lon 340..20
    pub const ATLANTIC_SEAM: (f64, f64, f64, f64) = (-30.0, 30.0, 340.0, 20.0);
}

/// Common date strings.
pub mod dates {
    /// Date of the reference profile
    pub const REFERENCE: &str = "2020-01-15";

    /// Default date window
    pub const WINDOW_MIN: &str = "2020-01-01";
    pub const WINDOW_MAX: &str = "2020-12-31";

    /// Epoch used by AVISO products for day counts
    pub const AVISO_EPOCH: &str = "1950-01-01";
}

/// Common interpolation grids as `(min, max, interval)` in dbar.
pub mod pressure {
    /// Three-level grid used by the reference profile
    pub const COARSE: (f64, f64, f64) = (0.0, 1000.0, 500.0);

    /// Standard 10 dbar grid from 10 to 1000 dbar
    pub const STANDARD: (f64, f64, f64) = (10.0, 1000.0, 10.0);
}

/// Profile records used throughout the test suite.
pub mod profiles {
    /// A well-formed record: 2020-01-15 at 10.2N 140.7E, three samples
    /// spanning 0..1000 dbar.
    pub const REFERENCE_RECORD: &str = "\
2020-01-15 10.2 140.7 3
pr sa te
   0.0  35.000  20.000
 500.0  34.500  10.000
1000.0  34.000   4.000
**
";

    /// Salinity of the reference record on the coarse grid
    pub const REFERENCE_SALINITY: [f64; 3] = [35.0, 34.5, 34.0];

    /// Temperature of the reference record on the coarse grid
    pub const REFERENCE_TEMPERATURE: [f64; 3] = [20.0, 10.0, 4.0];

    /// A record whose header claims five layers but carries four
    pub const SHORT_RECORD: &str = "\
2020-01-15 10.2 140.7 5
pr sa te
   0.0  35.000  20.000
 250.0  34.700  14.000
 500.0  34.500  10.000
1000.0  34.000   4.000
**
";
}

/// Map file names following the AVISO and OISST conventions.
pub mod maps {
    /// Sea surface height file for the reference date
    pub const SSH_REFERENCE: &str = "dt_global_allsat_phy_l4_20200115_20200121.cdl";

    /// Sea surface temperature file for the reference date
    pub const SST_REFERENCE: &str = "oisst-avhrr-v02r01.20200115.cdl";

    /// Default crop window edge length
    pub const WINDOW_SIZE: usize = 17;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_record_shape() {
        let lines: Vec<&str> = profiles::REFERENCE_RECORD.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].ends_with(" 3"));
        assert_eq!(lines[5], "**");
    }

    #[test]
    fn test_short_record_claims_more_layers() {
        let lines: Vec<&str> = profiles::SHORT_RECORD.lines().collect();
        assert!(lines[0].ends_with(" 5"));
        // header + label + 4 data lines + separator
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_coarse_grid_levels() {
        let (min, max, step) = pressure::COARSE;
        assert_eq!(((max - min) / step) as usize + 1, profiles::REFERENCE_SALINITY.len());
    }
}
