#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # nber-pipeline
//!
//! Conversion run orchestration: load the mapping specification, translate
//! every line of a fixed-width input file, and write the CSV output.
//!
//! Rows are buffered in memory and the output file is only replaced once the
//! whole input has translated, so a failed run never leaves a partial CSV.

pub mod config;
pub mod converter;

pub use config::{ConvertConfig, default_output_path};
pub use converter::{ConversionReport, Converter, convert_str};

use thiserror::Error;

/// The three ways a conversion run can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A file could not be read or written
    Io,
    /// The mapping specification is malformed
    Config,
    /// A field range falls outside an input line
    Location,
}

/// Errors that can occur during a conversion run
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error during {operation} for '{path}': {message}")]
    Io {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(nber_mapping::Error),

    #[error("Location error: {0}")]
    Location(nber_translate::TranslateError),
}

impl Error {
    /// Create a structured I/O error with operation/path context.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
            Self::Location(_) => ErrorKind::Location,
        }
    }
}

impl From<nber_translate::TranslateError> for Error {
    fn from(e: nber_translate::TranslateError) -> Self {
        match e {
            nber_translate::TranslateError::Write(message) => {
                Error::io("write csv", "<buffer>", message)
            }
            location => Error::Location(location),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
