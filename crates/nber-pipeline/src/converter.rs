//! Conversion run
//!
//! Loads the mapping specification, translates the input line by line, and
//! replaces the output file atomically once every line has translated.

use std::fs;
use std::path::{Path, PathBuf};

use nber_mapping::{MappingLoader, MappingSet};
use nber_translate::{CsvDocument, LineTranslator, MissingTranslation};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::{ConvertConfig, Error, Result};

/// Summary of a successful conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Data rows written, excluding the header
    pub rows: usize,
    /// Values passed through without a translation
    pub warnings: usize,
}

/// Runs one fixed-width to CSV conversion
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConvertConfig,
    loader: MappingLoader,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            config,
            loader: MappingLoader::new(),
        }
    }

    /// Load the mapping specification named by the configuration
    pub fn load_mappings(&self) -> Result<MappingSet> {
        let path = &self.config.mapping;
        self.loader.load_from_file(path).map_err(|e| match e {
            nber_mapping::Error::Io(io) => {
                Error::io("read mapping", path.display().to_string(), io.to_string())
            }
            other => Error::Config(other),
        })
    }

    /// Run the conversion.
    ///
    /// The mapping is loaded before the input is read, so a bad mapping fails
    /// without touching any data. The output file is only created or replaced
    /// after the whole input has translated.
    pub fn run(&self) -> Result<ConversionReport> {
        let input = self.config.input.clone();
        let output = self.config.output_path();

        let mappings = self.load_mappings()?;
        info!(
            mapping = %self.config.mapping.display(),
            fields = mappings.len(),
            "Loaded mapping specification"
        );

        if output == input {
            return Err(Error::io(
                "write output",
                output.display().to_string(),
                "output path is the same as the input file",
            ));
        }

        let text = fs::read_to_string(&input).map_err(|e| {
            Error::io("read input", input.display().to_string(), e.to_string())
        })?;

        let (document, warnings) = convert_str(&text, &mappings)?;
        write_atomically(&output, &document)?;

        info!(
            rows = document.len(),
            warnings = warnings.len(),
            output = %output.display(),
            "Conversion complete"
        );

        Ok(ConversionReport {
            input,
            output,
            rows: document.len(),
            warnings: warnings.len(),
        })
    }
}

/// Translate every line of `input` in order.
///
/// Lines are trimmed before translation. Each missing translation is logged
/// as soon as its line has been translated and also returned, in line order.
/// The first line that is too short for a field aborts the conversion.
pub fn convert_str(
    input: &str,
    mappings: &MappingSet,
) -> Result<(CsvDocument, Vec<MissingTranslation>)> {
    let translator = LineTranslator::new(mappings);
    let mut document = CsvDocument::from_mappings(mappings);
    let mut warnings = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let translated = translator.translate(line.trim(), index)?;
        for warning in document.push_line(translated) {
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    debug!(
        rows = document.len(),
        warnings = warnings.len(),
        "Translated input"
    );
    Ok((document, warnings))
}

/// Write the document to a temporary file next to `path`, then rename it
/// over `path`. The temporary file is removed if anything fails.
fn write_atomically(path: &Path, document: &CsvDocument) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| {
        Error::io(
            "create temporary output",
            dir.display().to_string(),
            e.to_string(),
        )
    })?;

    document
        .write_to(file.as_file_mut())
        .map_err(|e| Error::io("write output", path.display().to_string(), e.to_string()))?;

    file.persist(path)
        .map_err(|e| Error::io("replace output", path.display().to_string(), e.to_string()))?;

    debug!(path = %path.display(), "Wrote output file");
    Ok(())
}
