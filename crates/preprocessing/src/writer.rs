//! Writes a dataset to disk as raw `f32` arrays plus a JSON manifest.
//!
//! Layout of an output directory:
//!
//! ```text
//! <output_dir>/
//! ├── manifest.json     shapes, axis names, dtype, config
//! ├── info.f32          [N, 3]
//! ├── pressure.f32      [P]
//! ├── salinity.f32      [N, P]
//! ├── temperature.f32   [N, P]
//! ├── maps.f32          [N, 2, W, W]
//! └── summary.json      per-file report
//! ```
//!
//! Arrays are little-endian `f32`, row-major, with no header.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::PreprocessConfig;
use crate::dataset::{Dataset, Tensor};
use crate::error::{PreprocessError, Result};
use crate::report::RunSummary;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const SUMMARY_FILE: &str = "summary.json";

/// Element type tag in NumPy notation.
pub const DTYPE: &str = "<f4";

/// Description of one array file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayEntry {
    pub name: String,
    pub file: String,
    pub dtype: &'static str,
    pub shape: Vec<usize>,
    pub axes: Vec<String>,
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub created: DateTime<Utc>,
    pub profiles: usize,
    pub levels: usize,
    pub window_size: usize,
    pub arrays: Vec<ArrayEntry>,
    pub config: PreprocessConfig,
}

/// Write every array of `dataset` and the manifest into `dir`.
pub fn write_dataset(dir: &Path, dataset: &Dataset, config: &PreprocessConfig) -> Result<Manifest> {
    fs::create_dir_all(dir)?;

    let tensors = dataset.to_tensors();
    let mut arrays = Vec::with_capacity(5);
    for tensor in tensors.tensors() {
        arrays.push(write_tensor(dir, tensor)?);
    }

    let manifest = Manifest {
        created: Utc::now(),
        profiles: dataset.len(),
        levels: dataset.levels(),
        window_size: dataset.window_size(),
        arrays,
        config: config.clone(),
    };
    write_json(&dir.join(MANIFEST_FILE), &manifest)?;

    info!(
        dir = %dir.display(),
        profiles = manifest.profiles,
        levels = manifest.levels,
        window_size = manifest.window_size,
        "Wrote dataset"
    );
    Ok(manifest)
}

/// Write the run summary as `summary.json` into `dir`.
pub fn write_summary(dir: &Path, summary: &RunSummary) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_json(&dir.join(SUMMARY_FILE), summary)
}

fn write_tensor(dir: &Path, tensor: &Tensor<'_>) -> Result<ArrayEntry> {
    let file = format!("{}.f32", tensor.name);
    write_f32_file(&dir.join(&file), &tensor.data)?;

    Ok(ArrayEntry {
        name: tensor.name.to_string(),
        file,
        dtype: DTYPE,
        shape: tensor.shape.clone(),
        axes: tensor.axes.iter().map(|a| a.to_string()).collect(),
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Write values as little-endian `f32`.
pub fn write_f32_file(path: &Path, values: &[f32]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for v in values {
        out.write_all(&v.to_le_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Read a little-endian `f32` file back.
pub fn read_f32_file(path: &Path) -> Result<Vec<f32>> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    if bytes.len() % 4 != 0 {
        return Err(PreprocessError::ShapeMismatch(format!(
            "{} has {} bytes, not a whole number of f32 values",
            path.display(),
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
