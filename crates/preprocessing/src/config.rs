//! Preprocessing run configuration.
//!
//! Deserialized from YAML by the `preprocessor` binary. Only the input
//! directories and the date window are mandatory; every other section falls
//! back to its default.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use grid_processor::GridProcessorConfig;
use netcdf_parser::MapVariables;
use ocean_common::{BoundingBox, DateWindow, LongitudeConvention};
use profile_parser::DEFAULT_SEPARATOR;
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

/// Directory the run output lands in when none is configured.
pub const DEFAULT_OUTPUT_ROOT: &str = "data_storage";

/// Complete configuration of one preprocessing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub inputs: InputConfig,
    pub selection: SelectionConfig,
    #[serde(default)]
    pub grid: GridConfig,
    /// Interpolation, crop and cache sections.
    #[serde(flatten)]
    pub processing: GridProcessorConfig,
    #[serde(default)]
    pub variables: MapVariables,
    /// Size of the worker pool; 0 uses one worker per core.
    #[serde(default)]
    pub workers: usize,
    /// Where the dataset is written. Defaults to a timestamped directory
    /// under `data_storage/`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Input locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding the profile text files.
    pub profile_dir: PathBuf,
    /// Directory holding the SSH map files.
    pub ssh_dir: PathBuf,
    /// Directory holding the SST map files.
    pub sst_dir: PathBuf,
    /// Extension of profile files, without the dot.
    #[serde(default = "default_profile_extension")]
    pub profile_extension: String,
    /// Line separating records in a profile file.
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_profile_extension() -> String {
    "txt".to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

/// Which profiles are kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Region in the configured longitude convention. When absent every
    /// location is kept, whatever the convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<BoundingBox>,
    /// Inclusive window of observation dates.
    pub period: DateWindow,
}

/// How profile locations and dates are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Resolution (degrees) locations are snapped to.
    pub resolution: f64,
    /// Day zero of the elapsed-day index.
    pub epoch: NaiveDate,
    /// Convention for the region box and the snapped longitudes.
    pub longitude: LongitudeConvention,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 0.25,
            epoch: NaiveDate::from_ymd_opt(1950, 1, 1).expect("1950-01-01 is a valid date"),
            longitude: LongitudeConvention::ZeroTo360,
        }
    }
}

impl PreprocessConfig {
    /// Configuration with defaults for everything but the inputs and period.
    pub fn new(
        profile_dir: impl Into<PathBuf>,
        ssh_dir: impl Into<PathBuf>,
        sst_dir: impl Into<PathBuf>,
        period: DateWindow,
    ) -> Self {
        Self {
            inputs: InputConfig {
                profile_dir: profile_dir.into(),
                ssh_dir: ssh_dir.into(),
                sst_dir: sst_dir.into(),
                profile_extension: default_profile_extension(),
                separator: default_separator(),
            },
            selection: SelectionConfig {
                region: None,
                period,
            },
            grid: GridConfig::default(),
            processing: GridProcessorConfig::default(),
            variables: MapVariables::default(),
            workers: 0,
            output_dir: None,
        }
    }

    /// Override fields from environment variables that are set and parse.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("PREPROCESS_WORKERS") {
            if let Ok(workers) = val.parse() {
                self.workers = workers;
            }
        }
        self.processing.apply_env();
    }

    /// Region profiles are selected from, in the configured convention.
    pub fn region(&self) -> BoundingBox {
        self.selection
            .region
            .unwrap_or_else(|| BoundingBox::globe(self.grid.longitude))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.separator.trim().is_empty() {
            return Err(PreprocessError::config("separator must not be empty"));
        }
        if self.inputs.profile_extension.trim().is_empty() {
            return Err(PreprocessError::config("profile_extension must not be empty"));
        }

        if let Some(region) = &self.selection.region {
            region
                .validate()
                .map_err(|e| PreprocessError::config(format!("region: {}", e)))?;

            let (lo, hi) = self.grid.longitude.bounds();
            for lon in [region.min_lon, region.max_lon] {
                if lon < lo || lon > hi {
                    return Err(PreprocessError::config(format!(
                        "region longitude {} is outside the {} convention",
                        lon, self.grid.longitude
                    )));
                }
            }
        }
        self.selection
            .period
            .validate()
            .map_err(|e| PreprocessError::config(format!("period: {}", e)))?;

        let resolution = self.grid.resolution;
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(PreprocessError::config(format!(
                "grid resolution must be positive, got {}",
                resolution
            )));
        }

        self.processing.validate().map_err(PreprocessError::InvalidConfig)?;
        self.variables.validate().map_err(PreprocessError::InvalidConfig)?;
        Ok(())
    }

    /// Output directory for a run started at `started`.
    pub fn resolve_output_dir(&self, started: chrono::NaiveDateTime) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => run_directory(Path::new(DEFAULT_OUTPUT_ROOT), started),
        }
    }
}

/// `<root>/<YYYYmmddHHMMSS>` for a run started at `started`.
pub fn run_directory(root: &Path, started: chrono::NaiveDateTime) -> PathBuf {
    root.join(started.format("%Y%m%d%H%M%S").to_string())
}
