//! Error types shared by the ocean preprocessing crates.

use thiserror::Error;

/// Result type alias using OceanError.
pub type OceanResult<T> = Result<T, OceanError>;

/// Errors raised by the shared geodesic and calendar helpers.
#[derive(Debug, Error)]
pub enum OceanError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date window: {min} is after {max}")]
    InvalidDateWindow { min: String, max: String },

    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("Invalid grid resolution: {0}")]
    InvalidResolution(f64),

    #[error("Latitude out of range: {0}")]
    LatitudeOutOfRange(f64),
}
