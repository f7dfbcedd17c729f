//! Calendar helpers for profile dates and map file names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{OceanError, OceanResult};

/// Date formats accepted in profile headers and configuration.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Parse a calendar date in one of the accepted formats.
pub fn parse_date(s: &str) -> OceanResult<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| OceanError::InvalidDate(s.to_string()))
}

/// Whole days from `epoch` to `date` (negative if `date` precedes `epoch`).
pub fn elapsed_days(date: NaiveDate, epoch: NaiveDate) -> i64 {
    date.signed_duration_since(epoch).num_days()
}

/// Extract the first embedded calendar date from a file name.
///
/// Recognises `YYYY-MM-DD` and the leading eight digits of any digit run of
/// at least eight characters (`YYYYMMDD`, also the date part of
/// `YYYYMMDDHHMMSS` timestamps). Candidates that are not valid calendar
/// dates are skipped, so `dt_global_allsat_phy_l4_20200115_20200701.nc`
/// yields 2020-01-15.
pub fn date_from_filename(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() || (i > 0 && bytes[i - 1].is_ascii_digit()) {
            i += 1;
            continue;
        }

        let run = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();

        if run == 4 {
            if let Some(date) = name
                .get(i..i + 10)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            {
                return Some(date);
            }
        } else if run >= 8 {
            if let Some(date) = name
                .get(i..i + 8)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y%m%d").ok())
            {
                return Some(date);
            }
        }

        i += run;
    }

    None
}

/// Inclusive window of observation dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateWindow {
    pub fn new(min: NaiveDate, max: NaiveDate) -> OceanResult<Self> {
        let window = Self { min, max };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> OceanResult<()> {
        if self.min > self.max {
            return Err(OceanError::InvalidDateWindow {
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        Ok(())
    }

    /// `min <= date <= max`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.min && date <= self.max
    }

    /// Number of calendar days covered, both ends included.
    pub fn len_days(&self) -> i64 {
        elapsed_days(self.max, self.min) + 1
    }
}
