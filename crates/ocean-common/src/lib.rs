//! Common types and utilities shared across the ocean preprocessing crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{OceanError, OceanResult};
pub use grid::{normalize_longitude, snap_to_grid, GridCell, LongitudeConvention};
pub use time::{date_from_filename, elapsed_days, parse_date, DateWindow};
