//! Error types for the preprocessing crate.

use std::path::PathBuf;

use grid_processor::GridProcessorError;
use profile_parser::ParseError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single profile was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Header line could not be parsed.
    MalformedHeader,
    /// A data line could not be parsed.
    MalformedRecord,
    /// Location outside the configured region.
    OutOfRegion,
    /// Observation date outside the configured window.
    OutOfPeriod,
    /// No SSH map for the observation date.
    MissingSshMap,
    /// No SST map for the observation date.
    MissingSstMap,
    /// Fewer samples than the interpolator needs.
    InsufficientSamples,
    /// Pressure samples not strictly increasing.
    NonMonotonicPressure,
    /// Sample columns of unequal length or with non-finite values.
    InvalidSamples,
    /// The pressure grid reaches beyond the sampled range.
    Extrapolation,
    /// The crop window does not fit on the map.
    OutOfBounds,
    /// The crop window contains missing map cells.
    MissingMapValues,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "malformed_header",
            Self::MalformedRecord => "malformed_record",
            Self::OutOfRegion => "out_of_region",
            Self::OutOfPeriod => "out_of_period",
            Self::MissingSshMap => "missing_ssh_map",
            Self::MissingSstMap => "missing_sst_map",
            Self::InsufficientSamples => "insufficient_samples",
            Self::NonMonotonicPressure => "non_monotonic_pressure",
            Self::InvalidSamples => "invalid_samples",
            Self::Extrapolation => "extrapolation",
            Self::OutOfBounds => "out_of_bounds",
            Self::MissingMapValues => "missing_map_values",
        }
    }

    /// Reason for a per-record parse error. Fatal framing errors have none.
    pub fn from_parse_error(err: &ParseError) -> Option<Self> {
        match err {
            ParseError::MalformedHeader { .. } => Some(Self::MalformedHeader),
            ParseError::MalformedRecord { .. } => Some(Self::MalformedRecord),
            ParseError::Truncated { .. } | ParseError::Desynchronized { .. } => None,
        }
    }

    /// Reason for an interpolation or cropping error. Read and
    /// configuration failures have none.
    pub fn from_grid_error(err: &GridProcessorError) -> Option<Self> {
        match err {
            GridProcessorError::InsufficientSamples { .. } => Some(Self::InsufficientSamples),
            GridProcessorError::NonMonotonicPressure { .. } => Some(Self::NonMonotonicPressure),
            GridProcessorError::InvalidSamples(_) => Some(Self::InvalidSamples),
            GridProcessorError::OutOfBounds { .. } => Some(Self::OutOfBounds),
            GridProcessorError::MissingValues { .. } => Some(Self::MissingMapValues),
            GridProcessorError::ReadFailed(_) | GridProcessorError::ConfigError(_) => None,
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during preprocessing.
///
/// [`PreprocessError::Rejected`] concerns one profile and never leaves the
/// assembler. [`PreprocessError::is_file_fatal`] marks errors that discard
/// one profile file. Everything else aborts the run.
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("No *.{extension} profile files found in {}", dir.display())]
    NoInputFiles { dir: PathBuf, extension: String },

    #[error("Failed to scan {}: {message}", dir.display())]
    Scan { dir: PathBuf, message: String },

    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to load map {}: {source}", path.display())]
    MapRead {
        path: PathBuf,
        #[source]
        source: GridProcessorError,
    },

    #[error("Profile rejected: {0}")]
    Rejected(RejectReason),

    #[error("Grid processing failed: {0}")]
    Processing(GridProcessorError),

    #[error("Inconsistent dataset: {0}")]
    ShapeMismatch(String),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PreprocessError {
    /// Whether the error discards one profile file but lets the run go on.
    pub fn is_file_fatal(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::Parse { .. } | Self::MapRead { .. } | Self::Processing(_)
        )
    }

    /// Helper to create an InvalidConfig error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<GridProcessorError> for PreprocessError {
    fn from(err: GridProcessorError) -> Self {
        match RejectReason::from_grid_error(&err) {
            Some(reason) => Self::Rejected(reason),
            None => Self::Processing(err),
        }
    }
}

/// Result type for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessError>;
