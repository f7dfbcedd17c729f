//! Native NetCDF reading using the netcdf library.
//!
//! Enabled with the `native` feature. Avoids spawning an `ncdump` process per
//! map at the cost of linking libnetcdf and HDF5.

use std::path::Path;
use std::sync::Once;

use tracing::debug;

use crate::decode::Packing;
use crate::error::{NetCdfError, NetCdfResult};
use crate::map::{MapKind, SurfaceMap};
use crate::reader::{is_cdl_path, read_cdl_file, MapReader};
use crate::variables::MapVariables;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when
/// errors are handled by the caller, e.g. when probing for optional
/// attributes. Safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and passing null handlers is a
        // documented way to disable error output.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Reads maps with libnetcdf.
#[derive(Debug, Clone)]
pub struct NativeReader {
    variables: MapVariables,
}

impl NativeReader {
    pub fn new(variables: MapVariables) -> Self {
        Self { variables }
    }
}

impl MapReader for NativeReader {
    fn read_map(&self, path: &Path, kind: MapKind) -> NetCdfResult<SurfaceMap> {
        if is_cdl_path(path) {
            return read_cdl_file(path, kind, &self.variables);
        }

        silence_hdf5_errors();

        let file = netcdf::open(path)
            .map_err(|e| NetCdfError::Malformed(format!("Failed to open NetCDF: {}", e)))?;

        let lats = read_coordinate(&file, &self.variables.latitude)?;
        let lons = read_coordinate(&file, &self.variables.longitude)?;

        let candidates = self.variables.candidates(kind);
        let var = candidates
            .iter()
            .find_map(|name| file.variable(name))
            .ok_or_else(|| NetCdfError::Missing(format!("{} variable {:?}", kind, candidates)))?;

        let dims: Vec<(String, usize)> = var
            .dimensions()
            .iter()
            .map(|d| (d.name(), d.len()))
            .collect();
        if dims.len() < 2 || dims[..dims.len() - 2].iter().any(|(_, len)| *len != 1) {
            return Err(NetCdfError::Shape(format!(
                "{} has dimensions {:?}, expected (..., lat, lon)",
                var.name(),
                dims
            )));
        }

        let raw: Vec<f64> = var
            .get_values(..)
            .map_err(|e| NetCdfError::Malformed(format!("Failed to read {}: {}", var.name(), e)))?;

        let packing = Packing {
            scale_factor: get_f64_attr(&var, "scale_factor").unwrap_or(1.0),
            add_offset: get_f64_attr(&var, "add_offset").unwrap_or(0.0),
            fill_value: get_f64_attr(&var, "_FillValue"),
            missing_value: get_f64_attr(&var, "missing_value"),
        };
        let values = raw.iter().map(|&v| packing.unpack(v)).collect();

        debug!(path = %path.display(), variable = %var.name(), nlat = lats.len(), nlon = lons.len(), "Read native map");

        SurfaceMap::new(kind, lats, lons, values)
    }
}

fn read_coordinate(file: &netcdf::File, names: &[String]) -> NetCdfResult<Vec<f64>> {
    let var = names
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| NetCdfError::Missing(format!("coordinate variable {:?}", names)))?;
    var.get_values(..)
        .map_err(|e| NetCdfError::Malformed(format!("Failed to read {}: {}", var.name(), e)))
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{axis, cdl_map_text, create_ssh_grid, temp_test_dir, write_test_file};

    #[test]
    fn test_cdl_files_skip_libnetcdf() {
        let dir = temp_test_dir();
        let lats = axis(0.5, 1.0, 4);
        let lons = axis(130.5, 1.0, 6);
        let path = write_test_file(
            dir.path(),
            "ssh_20200115.cdl",
            &cdl_map_text("adt", &lats, &lons, &create_ssh_grid(&lats, &lons)),
        );

        let map = NativeReader::new(MapVariables::default())
            .read_map(&path, MapKind::Ssh)
            .unwrap();
        assert_eq!(map.nlon(), 6);
        assert_eq!(map.nlat(), 4);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = temp_test_dir();
        let reader = NativeReader::new(MapVariables::default());
        assert!(reader.read_map(&dir.path().join("absent.nc"), MapKind::Sst).is_err());
    }
}
