//! Profile interpolation and surface map windowing.
//!
//! This crate holds the numerical core of the preprocessing pipeline:
//!
//! - **Interpolation**: Akima splines resample irregular profiles onto a
//!   fixed pressure grid, leaving `NaN` wherever the grid reaches past the
//!   sampled range
//! - **Cropping**: square windows of SSH/SST maps centred on a profile's
//!   nearest grid node, wrapping in longitude on full-globe maps
//! - **Caching**: an LRU of decoded maps shared by all workers
//!
//! # Architecture
//!
//! ```text
//! ProfileRecord ──► interpolate_profile(pressure, salinity, temperature)
//!                        │
//!                        └─► InterpolatedProfile (NaN = extrapolation)
//!
//! (kind, date) ──► MapCache::get_or_load ──► Arc<SurfaceMap>
//!                                                 │
//!                                                 ▼
//!                              MapCropper::crop(map, lat, lon)
//!                                                 │
//!                                                 ▼
//!                                           SurfaceWindow
//! ```
//!
//! # Example
//!
//! ```
//! use grid_processor::{interpolate_profile, InterpolationConfig};
//!
//! let config = InterpolationConfig {
//!     min_pressure: 0.0,
//!     max_pressure: 1000.0,
//!     pressure_interval: 500.0,
//!     min_samples: 3,
//! };
//! let profile = interpolate_profile(
//!     &[0.0, 500.0, 1000.0],
//!     &[35.0, 34.5, 34.0],
//!     &[20.0, 10.0, 4.0],
//!     &config,
//! )
//! .unwrap();
//! assert_eq!(profile.salinity, vec![35.0, 34.5, 34.0]);
//! ```

pub mod cache;
pub mod config;
pub mod crop;
pub mod error;
pub mod interpolation;
pub mod types;

// Re-export commonly used types at crate root
pub use cache::{MapCache, MapKey};
pub use config::{CacheConfig, GridProcessorConfig};
pub use crop::{nearest_index, CropConfig, MapCropper, SurfaceWindow};
pub use error::{GridProcessorError, Result};
pub use interpolation::{
    interpolate_profile, AkimaSpline, InterpolatedProfile, InterpolationConfig, PressureGrid,
};
pub use types::CacheStats;
