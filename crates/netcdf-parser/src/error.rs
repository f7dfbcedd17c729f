//! Errors raised while reading surface maps.

use thiserror::Error;

pub type NetCdfResult<T> = Result<T, NetCdfError>;

#[derive(Error, Debug)]
pub enum NetCdfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A variable, dimension or data section none of the configured names
    /// matched.
    #[error("Map file lacks {0}")]
    Missing(String),

    /// CDL text or values that cannot be parsed.
    #[error("Malformed map file: {0}")]
    Malformed(String),

    /// Coordinate and data arrays disagree.
    #[error("Inconsistent map shape: {0}")]
    Shape(String),

    /// `ncdump` could not be run or exited with an error.
    #[error("ncdump failed: {0}")]
    Ncdump(String),
}
