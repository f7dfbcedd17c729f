//! Error types for profile parsing.

use thiserror::Error;

/// Result type for profile parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while reading a profile file.
///
/// Header and record errors concern a single profile; the reader has already
/// repositioned itself at the next record. Truncation and desynchronization
/// mean the record framing can no longer be trusted and the rest of the file
/// must be abandoned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Header line has the wrong field count or a field failed to parse.
    #[error("line {line}: malformed header: {reason}")]
    MalformedHeader { line: usize, reason: String },

    /// A data line has the wrong field count or a non-numeric field.
    #[error("line {line}: malformed data line: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// The file ended in the middle of a record.
    #[error("line {line}: file ended inside a record, expected {expected}")]
    Truncated { line: usize, expected: String },

    /// A separator appeared where a data line was expected, or vice versa.
    #[error("line {line}: record framing lost, expected {expected} but found {found:?}")]
    Desynchronized {
        line: usize,
        expected: String,
        found: String,
    },
}

impl ParseError {
    /// Whether the remainder of the file has to be abandoned.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Truncated { .. } | Self::Desynchronized { .. })
    }

    /// 1-based line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedHeader { line, .. }
            | Self::MalformedRecord { line, .. }
            | Self::Truncated { line, .. }
            | Self::Desynchronized { line, .. } => *line,
        }
    }

    pub(crate) fn header(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn record(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}
