//! Turning a parsed CDL document into a [`SurfaceMap`].

use crate::cdl::{CdlDocument, CdlVariable};
use crate::error::{NetCdfError, NetCdfResult};
use crate::map::{MapKind, SurfaceMap};
use crate::variables::MapVariables;

/// Packing attributes of a data variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            missing_value: None,
        }
    }
}

impl Packing {
    pub fn from_variable(var: &CdlVariable) -> Self {
        Self {
            scale_factor: var.attribute_f64("scale_factor").unwrap_or(1.0),
            add_offset: var.attribute_f64("add_offset").unwrap_or(0.0),
            fill_value: var.attribute_f64("_FillValue"),
            missing_value: var.attribute_f64("missing_value"),
        }
    }

    /// Apply scale and offset, mapping fill and missing markers to `NaN`.
    pub fn unpack(&self, raw: f64) -> f32 {
        if raw.is_nan() || Some(raw) == self.fill_value || Some(raw) == self.missing_value {
            return f32::NAN;
        }
        (raw * self.scale_factor + self.add_offset) as f32
    }
}

/// Decode one surface variable and its lat/lon axes from a CDL document.
///
/// The data variable must be two-dimensional over the latitude and longitude
/// axes, apart from leading dimensions of length 1 (a single time step or
/// depth level). Either axis order is accepted.
pub fn decode_surface_map(
    doc: &CdlDocument,
    kind: MapKind,
    variables: &MapVariables,
) -> NetCdfResult<SurfaceMap> {
    let (lat_name, lat_var) = doc
        .find_variable(&variables.latitude)
        .ok_or_else(|| NetCdfError::Missing(format!("latitude variable {:?}", variables.latitude)))?;
    let (lon_name, lon_var) = doc
        .find_variable(&variables.longitude)
        .ok_or_else(|| NetCdfError::Missing(format!("longitude variable {:?}", variables.longitude)))?;
    let candidates = variables.candidates(kind);
    let (data_name, data_var) = doc
        .find_variable(candidates)
        .ok_or_else(|| NetCdfError::Missing(format!("{} variable {:?}", kind, candidates)))?;

    let lats = coordinate_values(lat_name, lat_var)?;
    let lons = coordinate_values(lon_name, lon_var)?;
    let raw = data_var
        .data
        .as_ref()
        .ok_or_else(|| NetCdfError::Missing(format!("data section for {}", data_name)))?;

    let lat_dim = lat_var.dims.first().map(String::as_str).unwrap_or(lat_name);
    let lon_dim = lon_var.dims.first().map(String::as_str).unwrap_or(lon_name);
    let transposed = grid_layout(doc, data_name, data_var, lat_dim, lon_dim)?;

    if raw.len() != lats.len() * lons.len() {
        return Err(NetCdfError::Shape(format!(
            "{} has {} values for a {}x{} grid",
            data_name,
            raw.len(),
            lats.len(),
            lons.len()
        )));
    }

    let packing = Packing::from_variable(data_var);
    let mut values: Vec<f32> = raw.iter().map(|&v| packing.unpack(v)).collect();

    if transposed {
        values = transpose(&values, lons.len(), lats.len());
    }

    SurfaceMap::new(kind, lats, lons, values)
}

fn coordinate_values(name: &str, var: &CdlVariable) -> NetCdfResult<Vec<f64>> {
    let values = var
        .data
        .as_ref()
        .ok_or_else(|| NetCdfError::Missing(format!("data section for {}", name)))?;
    if values.iter().any(|v| !v.is_finite()) {
        return Err(NetCdfError::Malformed(format!(
            "coordinate {} contains missing values",
            name
        )));
    }
    Ok(values.clone())
}

/// Check the data variable's dimensions and report whether it is stored
/// longitude-major.
fn grid_layout(
    doc: &CdlDocument,
    data_name: &str,
    data_var: &CdlVariable,
    lat_dim: &str,
    lon_dim: &str,
) -> NetCdfResult<bool> {
    let dims = &data_var.dims;
    if dims.len() < 2 {
        return Err(NetCdfError::Shape(format!(
            "{} has {} dimensions, expected at least 2",
            data_name,
            dims.len()
        )));
    }

    let (leading, grid) = dims.split_at(dims.len() - 2);
    for dim in leading {
        match doc.dimension(dim) {
            Some(1) => {}
            Some(len) => {
                return Err(NetCdfError::Shape(format!(
                    "{} dimension {} has length {}, expected 1",
                    data_name, dim, len
                )))
            }
            None => {
                return Err(NetCdfError::Missing(format!("dimension {}", dim)));
            }
        }
    }

    if grid[0] == lat_dim && grid[1] == lon_dim {
        Ok(false)
    } else if grid[0] == lon_dim && grid[1] == lat_dim {
        Ok(true)
    } else {
        Err(NetCdfError::Shape(format!(
            "{} is laid out over ({}, {}), expected ({}, {})",
            data_name, grid[0], grid[1], lat_dim, lon_dim
        )))
    }
}

fn transpose(values: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![0.0; values.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = values[r * cols + c];
        }
    }
    out
}
