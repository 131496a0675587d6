//! Error types for line translation with context

use thiserror::Error;

/// Errors that can occur while translating lines or writing the CSV document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// A field range starts beyond the end of the line
    #[error(
        "Line {line} has no value for '{key}': field starts at column {start} but the line is {length} characters long"
    )]
    Location {
        line: usize,
        key: String,
        start: usize,
        length: usize,
    },

    /// CSV write error
    #[error("CSV write error: {0}")]
    Write(String),
}

impl TranslateError {
    /// Create a location error for a field that falls outside the line
    pub fn location(line: usize, key: impl Into<String>, start: usize, length: usize) -> Self {
        Self::Location {
            line,
            key: key.into(),
            start,
            length,
        }
    }

    /// Create a write error
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write(message.into())
    }

    /// Get the line index if available
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Location { line, .. } => Some(*line),
            Self::Write(_) => None,
        }
    }
}

impl From<csv::Error> for TranslateError {
    fn from(e: csv::Error) -> Self {
        Self::Write(e.to_string())
    }
}

impl From<std::io::Error> for TranslateError {
    fn from(e: std::io::Error) -> Self {
        Self::Write(e.to_string())
    }
}

/// Result type alias for translation operations
pub type TranslateResult<T> = std::result::Result<T, TranslateError>;
