//! Ocean profile preprocessing.
//!
//! Turns irregular profile text files and daily SSH/SST map files into an
//! aligned dataset of profile keys, interpolated profiles and surface
//! windows.
//!
//! # Architecture
//!
//! ```text
//! profiles/*.txt ──► ProfileReader ──► Matcher ──► interpolate_profile
//!                                        │  ▲               │
//!                     region, period ────┘  │               ▼
//!                                           │        MapCropper::crop ◄── MapCache ◄── MapReader
//! ssh/*.nc, sst/*.nc ──► MapCatalog ────────┘               │
//!                                                           ▼
//!                                                       ProfileRow
//!                                                           │
//!                      (files in name order, rows in file order)
//!                                                           ▼
//!                                                Dataset ──► TensorBundle ──► writer
//! ```
//!
//! Per-profile problems reject the profile and are counted by
//! [`RejectReason`]. Broken framing, unreadable files and unreadable maps
//! discard the whole file. Only configuration and input discovery errors
//! abort the run.

pub mod assembler;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod matcher;
pub mod report;
pub mod writer;

// Re-exports
pub use assembler::{DatasetAssembler, FileOutcome};
pub use catalog::{list_profile_files, MapCatalog, MAP_EXTENSIONS};
pub use config::{GridConfig, InputConfig, PreprocessConfig, SelectionConfig};
pub use dataset::{Dataset, DatasetBuilder, ProfileRow, Tensor, TensorBundle};
pub use error::{PreprocessError, RejectReason, Result};
pub use matcher::{find_map_file, in_period, MatchedMaps, Matcher};
pub use report::{FileReport, RunSummary};
pub use writer::{read_f32_file, write_dataset, write_summary, Manifest};
