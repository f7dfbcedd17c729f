//! Error types for interpolation, cropping and map caching.

use netcdf_parser::{MapKind, NetCdfError};
use thiserror::Error;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// Too few samples to build a spline.
    #[error("insufficient samples: found {found}, need at least {required}")]
    InsufficientSamples { found: usize, required: usize },

    /// Pressure samples are not strictly increasing.
    #[error("pressure not strictly increasing at sample {index}")]
    NonMonotonicPressure { index: usize },

    /// Sample arrays disagree in length or contain non-finite values.
    #[error("invalid samples: {0}")]
    InvalidSamples(String),

    /// The requested window does not fit inside the map.
    #[error("requested window {requested} is outside grid bounds {grid}")]
    OutOfBounds { requested: String, grid: String },

    /// The cropped window contains fill or missing values.
    #[error("{kind} window has {count} missing values")]
    MissingValues { kind: MapKind, count: usize },

    /// A map file could not be decoded.
    #[error("failed to read map: {0}")]
    ReadFailed(#[from] NetCdfError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl GridProcessorError {
    /// Create an OutOfBounds error.
    pub fn out_of_bounds(requested: impl Into<String>, grid: impl Into<String>) -> Self {
        Self::OutOfBounds {
            requested: requested.into(),
            grid: grid.into(),
        }
    }

    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
