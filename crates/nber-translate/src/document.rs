//! In-memory CSV document and writer

use std::io::Write;

use nber_mapping::MappingSet;
use tracing::{debug, trace};

use crate::errors::TranslateResult;
use crate::translator::{DELIMITER, MissingTranslation, TranslatedLine};

/// Row terminator
const TERMINATOR: u8 = b'\n';

/// A header plus the translated rows, buffered until the whole input has
/// been translated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDocument {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvDocument {
    /// Create an empty document with the given header fields
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Create an empty document whose header is the mapping keys
    pub fn from_mappings(mappings: &MappingSet) -> Self {
        Self::new(mappings.keys().map(str::to_string).collect())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Append a translated line, handing its warnings back to the caller
    pub fn push_line(&mut self, line: TranslatedLine) -> Vec<MissingTranslation> {
        let (values, warnings) = line.into_parts();
        self.rows.push(values);
        warnings
    }

    /// Number of data rows, excluding the header
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the header and every row, each terminated by `\n`.
    ///
    /// Values are written unquoted so each row is exactly the comma-joined
    /// translated values.
    pub fn write_to<W: Write>(&self, writer: W) -> TranslateResult<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER as u8)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(TERMINATOR))
            .from_writer(writer);

        write_record(&mut csv_writer, &self.header)?;

        for row in &self.rows {
            write_record(&mut csv_writer, row)?;
            trace!(?row, "Wrote CSV row");
        }

        csv_writer.flush()?;
        debug!(row_count = self.rows.len(), "Finished writing CSV");
        Ok(())
    }

    /// Render the document to a string
    pub fn to_csv_string(&self) -> TranslateResult<String> {
        let mut output = Vec::new();
        self.write_to(&mut output)?;
        // Inputs are &str and nothing is quoted, so the bytes stay UTF-8
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

/// The csv writer quotes a record with no fields or a single empty field
/// as `""`; those rows are written as a bare terminator instead.
fn write_record<W: Write>(
    csv_writer: &mut csv::Writer<W>,
    fields: &[String],
) -> TranslateResult<()> {
    match fields {
        [] => {}
        [only] if only.is_empty() => {}
        _ => {
            csv_writer.write_record(fields)?;
            return Ok(());
        }
    }

    csv_writer.flush()?;
    csv_writer.get_mut().write_all(&[TERMINATOR])?;
    Ok(())
}
