//! Pull-based reader over the records of one profile file.

use std::iter::Enumerate;
use std::str::Lines;

use tracing::trace;

use crate::error::{ParseError, ParseResult};
use crate::header::ProfileHeader;
use crate::record::RawProfile;

/// Default record separator line.
pub const DEFAULT_SEPARATOR: &str = "**";

/// Upper bound on the data lines reserved up front for one record.
const MAX_PREALLOCATED_LAYERS: usize = 4096;

/// Iterates the records of one profile file.
///
/// Each record is a header line, a label line, `layer_count` data lines and
/// a separator line. The reader always consumes a whole record before
/// yielding it, whether or not the caller ends up keeping it.
///
/// Yields `Err` for a malformed header (after skipping past the next
/// separator) and for framing errors. After a fatal error
/// ([`ParseError::is_fatal`]) the iterator is exhausted.
pub struct ProfileReader<'a> {
    lines: Enumerate<Lines<'a>>,
    separator: String,
    last_line: usize,
    finished: bool,
}

impl<'a> ProfileReader<'a> {
    /// Create a reader using the default `**` separator.
    pub fn new(text: &'a str) -> Self {
        Self::with_separator(text, DEFAULT_SEPARATOR)
    }

    /// Create a reader with a custom separator line.
    pub fn with_separator(text: &'a str, separator: &str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            separator: separator.trim().to_string(),
            last_line: 0,
            finished: false,
        }
    }

    fn is_separator(&self, text: &str) -> bool {
        text.trim() == self.separator
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let (idx, text) = self.lines.next()?;
        self.last_line = idx + 1;
        Some((idx + 1, text))
    }

    /// Skip lines up to and including the next separator.
    ///
    /// Returns false if the file ended first.
    fn skip_past_separator(&mut self) -> bool {
        while let Some((_, text)) = self.next_line() {
            if self.is_separator(text) {
                return true;
            }
        }
        false
    }

    fn fail(&mut self, err: ParseError) -> Option<ParseResult<RawProfile<'a>>> {
        self.finished = true;
        Some(Err(err))
    }

    fn truncated(&mut self, expected: String) -> Option<ParseResult<RawProfile<'a>>> {
        let line = self.last_line;
        self.fail(ParseError::Truncated { line, expected })
    }
}

impl<'a> Iterator for ProfileReader<'a> {
    type Item = ParseResult<RawProfile<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // Blank lines between records (and at end of file) are not records
        let (header_line, header_text) = loop {
            match self.next_line() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some((_, text)) if text.trim().is_empty() => continue,
                Some(found) => break found,
            }
        };

        if self.is_separator(header_text) {
            return self.fail(ParseError::Desynchronized {
                line: header_line,
                expected: "header line".to_string(),
                found: header_text.to_string(),
            });
        }

        let header = match ProfileHeader::parse(header_text, header_line) {
            Ok(header) => header,
            Err(err) => {
                // Without a layer count the body length is unknown; resume
                // after the next separator.
                if !self.skip_past_separator() {
                    self.finished = true;
                }
                return Some(Err(err));
            }
        };

        match self.next_line() {
            None => return self.truncated("column label line".to_string()),
            Some((line, text)) if self.is_separator(text) => {
                return self.fail(ParseError::Desynchronized {
                    line,
                    expected: "column label line".to_string(),
                    found: text.to_string(),
                })
            }
            Some(_) => {}
        }

        let mut data = Vec::with_capacity(header.layer_count.min(MAX_PREALLOCATED_LAYERS));
        for read in 0..header.layer_count {
            match self.next_line() {
                None => {
                    return self.truncated(format!(
                        "{} data lines, found {}",
                        header.layer_count, read
                    ))
                }
                Some((line, text)) if self.is_separator(text) => {
                    return self.fail(ParseError::Desynchronized {
                        line,
                        expected: format!("{} data lines, found {}", header.layer_count, read),
                        found: text.to_string(),
                    })
                }
                Some(entry) => data.push(entry),
            }
        }

        match self.next_line() {
            None => return self.truncated("record separator".to_string()),
            Some((line, text)) if !self.is_separator(text) => {
                return self.fail(ParseError::Desynchronized {
                    line,
                    expected: "record separator".to_string(),
                    found: text.to_string(),
                })
            }
            Some(_) => {}
        }

        trace!(
            line = header_line,
            layers = header.layer_count,
            "Framed profile record"
        );

        Some(Ok(RawProfile::new(header, header_line, data)))
    }
}
