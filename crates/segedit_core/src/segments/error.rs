//! Segment error types.

use crate::vfs::WriteError;

/// Errors that can occur while building, reading or writing segments.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// Segment bounds rejected at construction.
    #[error("Invalid segment: {0}")]
    Validation(#[from] ValidationError),

    /// Malformed timecode or numeric field.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Writing an output file failed after every path variation.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: WriteError,
    },
}

/// Segment bounds that can never be represented.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// End lies before start.
    #[error("Segment end time ({end}) must not be before start time ({start})")]
    EndBeforeStart { start: f64, end: f64 },

    /// Negative start time.
    #[error("Segment start time ({0}) must not be negative")]
    NegativeStart(f64),

    /// NaN or infinite bound.
    #[error("Segment bounds must be finite (start={start}, end={end})")]
    NotFinite { start: f64, end: f64 },
}

/// Errors raised while decoding textual time or numeric fields.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// Timecode could not be parsed.
    #[error("Invalid timecode: '{0}'")]
    InvalidTimecode(String),

    /// A numeric field in an EDL line could not be parsed.
    #[error("Invalid {field} value: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// A line carries fewer fields than required.
    #[error("Expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },
}

impl SegmentError {
    /// Create a write failure for the given target path.
    pub fn write_failed(path: impl Into<String>, source: WriteError) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

impl FormatError {
    /// Create an invalid number error.
    pub fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field,
            value: value.into(),
        }
    }
}

/// Result type for segment operations.
pub type SegmentResult<T> = Result<T, SegmentError>;
