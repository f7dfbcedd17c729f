//! Test data generators for profile files and surface maps.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use std::fmt::Write;

/// One `(pressure, salinity, temperature)` sample.
pub type Sample = (f64, f64, f64);

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that a window was cut from the right place
/// by checking that grid[row][col] == col * 1000 + row.
///
/// # Arguments
///
/// * `width` - Number of columns (longitudes)
/// * `height` - Number of rows (latitudes)
///
/// # Returns
///
/// A `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Cell-centred axis from `start` with `count` points spaced by `step`.
///
/// # Example
///
/// ```
/// use test_utils::axis;
///
/// assert_eq!(axis(0.125, 0.25, 3), vec![0.125, 0.375, 0.625]);
/// ```
pub fn axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Latitude and longitude axes of a global grid with cell centres at half
/// steps: latitudes from `-90 + step/2`, longitudes from `step/2` in
/// `[0, 360)`.
pub fn global_axes(step: f64) -> (Vec<f64>, Vec<f64>) {
    let nlat = (180.0 / step).round() as usize;
    let nlon = (360.0 / step).round() as usize;
    (
        axis(-90.0 + step / 2.0, step, nlat),
        axis(step / 2.0, step, nlon),
    )
}

/// Creates a sea surface height-like grid in metres.
///
/// Values vary smoothly between about -1 and 1 m.
pub fn create_ssh_grid(lats: &[f64], lons: &[f64]) -> Vec<f32> {
    let mut data = Vec::with_capacity(lats.len() * lons.len());
    for lat in lats {
        for lon in lons {
            data.push((lat.to_radians().cos() * lon.to_radians().sin()) as f32);
        }
    }
    data
}

/// Creates a sea surface temperature-like grid in degrees Celsius.
///
/// Warm at the equator (30°C), cold at the poles (about 0°C).
pub fn create_sst_grid(lats: &[f64], lons: &[f64]) -> Vec<f32> {
    let mut data = Vec::with_capacity(lats.len() * lons.len());
    for lat in lats {
        for _ in lons {
            data.push((30.0 * lat.to_radians().cos()) as f32);
        }
    }
    data
}

/// Profile samples with salinity and temperature decreasing linearly with
/// pressure.
///
/// Pressures are evenly spaced from 0 to `max_pressure` inclusive.
pub fn linear_profile(count: usize, max_pressure: f64) -> Vec<Sample> {
    let step = if count > 1 {
        max_pressure / (count - 1) as f64
    } else {
        0.0
    };
    (0..count)
        .map(|i| {
            let p = i as f64 * step;
            (p, 35.0 - p * 0.001, 20.0 - p * 0.016)
        })
        .collect()
}

/// Formats one profile record: header, label line, data lines, separator.
///
/// # Example
///
/// ```
/// use test_utils::profile_record_text;
///
/// let text = profile_record_text("2020-01-15", 10.2, 140.7, &[(0.0, 35.0, 20.0)]);
/// assert_eq!(text, "2020-01-15 10.2 140.7 1\npr sa te\n0.0 35.0 20.0\n**\n");
/// ```
pub fn profile_record_text(date: &str, lat: f64, lon: f64, samples: &[Sample]) -> String {
    profile_record_with_count(date, lat, lon, samples.len(), samples)
}

/// Formats a profile record whose header claims `layer_count` lines,
/// regardless of how many samples are written.
pub fn profile_record_with_count(
    date: &str,
    lat: f64,
    lon: f64,
    layer_count: usize,
    samples: &[Sample],
) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{} {:?} {:?} {}", date, lat, lon, layer_count);
    text.push_str("pr sa te\n");
    for (p, s, t) in samples {
        let _ = writeln!(text, "{:?} {:?} {:?}", p, s, t);
    }
    text.push_str("**\n");
    text
}

/// Concatenates records into one profile file.
pub fn profile_file_text(records: &[String]) -> String {
    records.concat()
}

/// Formats a CDL document (`ncdump` output) for one surface variable.
///
/// The variable is declared over `(time, lat, lon)` with a single time step.
/// `NaN` values are written as the `_` fill marker.
pub fn cdl_map_text(variable: &str, lats: &[f64], lons: &[f64], values: &[f32]) -> String {
    assert_eq!(values.len(), lats.len() * lons.len(), "grid shape mismatch");

    let mut text = String::new();
    let _ = writeln!(text, "netcdf {}_map {{", variable);
    text.push_str("dimensions:\n");
    text.push_str("\ttime = UNLIMITED ; // (1 currently)\n");
    let _ = writeln!(text, "\tlat = {} ;", lats.len());
    let _ = writeln!(text, "\tlon = {} ;", lons.len());
    text.push_str("variables:\n");
    text.push_str("\tdouble lat(lat) ;\n\t\tlat:units = \"degrees_north\" ;\n");
    text.push_str("\tdouble lon(lon) ;\n\t\tlon:units = \"degrees_east\" ;\n");
    let _ = writeln!(text, "\tfloat {}(time, lat, lon) ;", variable);
    let _ = writeln!(text, "\t\t{}:_FillValue = -9999.f ;", variable);
    text.push_str("data:\n\n");

    write_cdl_values(&mut text, "lat", lats.iter().map(|v| format!("{:?}", v)));
    write_cdl_values(&mut text, "lon", lons.iter().map(|v| format!("{:?}", v)));
    write_cdl_values(
        &mut text,
        variable,
        values.iter().map(|v| {
            if v.is_nan() {
                "_".to_string()
            } else {
                format!("{:?}", v)
            }
        }),
    );
    text.push_str("}\n");
    text
}

fn write_cdl_values(text: &mut String, name: &str, values: impl Iterator<Item = String>) {
    let values: Vec<String> = values.collect();
    let _ = write!(text, " {} =", name);
    for (i, chunk) in values.chunks(8).enumerate() {
        if i > 0 {
            text.push_str(",\n   ");
        }
        let _ = write!(text, " {}", chunk.join(", "));
    }
    text.push_str(" ;\n\n");
}
