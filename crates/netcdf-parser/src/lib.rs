//! Readers for gridded sea surface height and temperature maps.
//!
//! Map files are NetCDF grids over latitude and longitude, one file per
//! variable kind per day. By default they are read through the `ncdump`
//! command-line tool and its CDL text output, which needs no native
//! libraries at build time. Saved CDL text (`*.cdl`) is read directly.
//! The `native` feature switches `.nc` files to libnetcdf.
//!
//! Decoded maps have ascending coordinate axes, scale and offset applied,
//! and `NaN` for fill or missing values.

pub mod cdl;
pub mod decode;
pub mod error;
pub mod map;
#[cfg(feature = "native")]
pub mod native;
pub mod reader;
pub mod variables;

pub use cdl::{CdlDocument, CdlVariable};
pub use decode::{decode_surface_map, Packing};
pub use error::{NetCdfError, NetCdfResult};
pub use map::{MapKind, SurfaceMap};
pub use reader::{default_reader, is_cdl_path, read_cdl_file, MapReader, NcdumpReader};
pub use variables::MapVariables;
