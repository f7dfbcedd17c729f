//! Profile records and data line parsing.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};
use crate::header::ProfileHeader;

/// A fully parsed profile.
///
/// The three sample vectors always have `header.layer_count` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub header: ProfileHeader,
    pub pressure: Vec<f64>,
    pub salinity: Vec<f64>,
    pub temperature: Vec<f64>,
}

impl ProfileRecord {
    /// Number of samples in the profile.
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Pressure range covered by the samples, if any.
    pub fn pressure_range(&self) -> Option<(f64, f64)> {
        let first = *self.pressure.first()?;
        Some(
            self.pressure
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }
}

/// A record whose framing has been verified but whose data lines are not yet
/// converted to numbers.
///
/// Callers can inspect the header and drop the record without paying for the
/// numeric parse; the reader has consumed the full record either way.
#[derive(Debug, Clone)]
pub struct RawProfile<'a> {
    pub header: ProfileHeader,
    /// 1-based line number of the header.
    pub line: usize,
    data: Vec<(usize, &'a str)>,
}

impl<'a> RawProfile<'a> {
    pub(crate) fn new(header: ProfileHeader, line: usize, data: Vec<(usize, &'a str)>) -> Self {
        Self { header, line, data }
    }

    /// Convert the data lines into a [`ProfileRecord`].
    pub fn parse_samples(&self) -> ParseResult<ProfileRecord> {
        let n = self.data.len();
        let mut pressure = Vec::with_capacity(n);
        let mut salinity = Vec::with_capacity(n);
        let mut temperature = Vec::with_capacity(n);

        for &(line, text) in &self.data {
            let (p, s, t) = parse_data_line(text, line)?;
            pressure.push(p);
            salinity.push(s);
            temperature.push(t);
        }

        Ok(ProfileRecord {
            header: self.header,
            pressure,
            salinity,
            temperature,
        })
    }
}

/// Parse `pressure salinity temperature` separated by runs of whitespace.
pub fn parse_data_line(text: &str, line: usize) -> ParseResult<(f64, f64, f64)> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(ParseError::record(
            line,
            format!("expected 3 fields, found {}", fields.len()),
        ));
    }

    let mut values = [0.0f64; 3];
    for (slot, field) in values.iter_mut().zip(&fields) {
        *slot = match field.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(ParseError::record(
                    line,
                    format!("invalid number '{}'", field),
                ))
            }
        };
    }

    Ok((values[0], values[1], values[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_data_line("   5.0   34.512   21.3", 3).unwrap(),
            (5.0, 34.512, 21.3)
        );
        assert_eq!(parse_data_line("5\t34\t21", 3).unwrap(), (5.0, 34.0, 21.0));
    }

    #[test]
    fn test_parse_data_line_errors() {
        let err = parse_data_line("5.0 34.5", 9).unwrap_err();
        assert_eq!(err.line(), 9);
        assert!(!err.is_fatal());

        assert!(parse_data_line("5.0 34.5 21.3 1.0", 9).is_err());
        assert!(parse_data_line("5.0 abc 21.3", 9).is_err());
        assert!(parse_data_line("5.0 NaN 21.3", 9).is_err());
        assert!(parse_data_line("", 9).is_err());
    }
}
