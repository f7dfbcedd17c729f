//! Profile header line parsing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// Location, date and sample count of one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileHeader {
    pub observation_date: NaiveDate,
    /// Degrees north, in [-90, 90].
    pub latitude: f64,
    /// Degrees east, as written in the file (either convention).
    pub longitude: f64,
    pub layer_count: usize,
}

impl ProfileHeader {
    /// Parse a header line: `date lat lon layer_count`.
    ///
    /// Fields may be separated by whitespace, commas, or both.
    pub fn parse(text: &str, line: usize) -> ParseResult<Self> {
        let fields: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();

        if fields.len() != 4 {
            return Err(ParseError::header(
                line,
                format!("expected 4 fields, found {}", fields.len()),
            ));
        }

        let observation_date = ocean_common::parse_date(fields[0])
            .map_err(|e| ParseError::header(line, e.to_string()))?;

        let latitude = parse_coordinate(fields[1], "latitude", line)?;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ParseError::header(
                line,
                format!("latitude {} outside [-90, 90]", latitude),
            ));
        }

        let longitude = parse_coordinate(fields[2], "longitude", line)?;

        let layer_count = fields[3].parse::<usize>().map_err(|_| {
            ParseError::header(line, format!("invalid layer count '{}'", fields[3]))
        })?;

        Ok(Self {
            observation_date,
            latitude,
            longitude,
            layer_count,
        })
    }
}

fn parse_coordinate(field: &str, name: &str, line: usize) -> ParseResult<f64> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::header(
            line,
            format!("invalid {} '{}'", name, field),
        )),
    }
}
