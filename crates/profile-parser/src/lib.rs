//! Parser for concatenated ocean profile text files.
//!
//! A profile file holds any number of records laid out as:
//!
//! ```text
//! 2020-01-15 10.2 140.7 3        <- header: date lat lon layer_count
//! pr sa te                       <- column labels (ignored)
//!    0.0  35.000  20.000         <- layer_count data lines
//!  500.0  34.500  10.000
//! 1000.0  34.000   4.000
//! **                             <- separator
//! ```
//!
//! [`ProfileReader`] walks the file forward one record at a time. Framing is
//! checked before a record is handed out, so callers can filter on the
//! header and drop a record without parsing its samples.
//!
//! # Example
//!
//! ```
//! use profile_parser::ProfileReader;
//!
//! let text = "2020-01-15 10.2 140.7 1\npr sa te\n5.0 35.0 20.0\n**\n";
//! let raw = ProfileReader::new(text).next().unwrap().unwrap();
//! assert_eq!(raw.header.layer_count, 1);
//! let record = raw.parse_samples().unwrap();
//! assert_eq!(record.pressure, vec![5.0]);
//! ```

pub mod error;
pub mod header;
pub mod reader;
pub mod record;

pub use error::{ParseError, ParseResult};
pub use header::ProfileHeader;
pub use reader::{ProfileReader, DEFAULT_SEPARATOR};
pub use record::{parse_data_line, ProfileRecord, RawProfile};
