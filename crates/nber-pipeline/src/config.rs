//! Conversion run configuration

use std::path::{Path, PathBuf};

use nber_mapping::DEFAULT_MAPPING_PATH;

/// Extension given to derived output paths
const CSV_EXTENSION: &str = "csv";

/// Paths for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Fixed-width input file
    pub input: PathBuf,
    /// CSV output file; derived from `input` when unset
    pub output: Option<PathBuf>,
    /// Mapping specification (default: `translations.json` in the working directory)
    pub mapping: PathBuf,
}

impl ConvertConfig {
    /// Create a configuration for the given input with default output and
    /// mapping paths
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            mapping: PathBuf::from(DEFAULT_MAPPING_PATH),
        }
    }

    /// Set the output path
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the mapping specification path
    pub fn mapping(mut self, mapping: impl Into<PathBuf>) -> Self {
        self.mapping = mapping.into();
        self
    }

    /// The output path this run writes to
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

/// The input path with its extension replaced by `.csv`
/// (`births.dat` -> `births.csv`, `births` -> `births.csv`)
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(CSV_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::new("data/births.dat");
        assert_eq!(config.mapping, PathBuf::from("translations.json"));
        assert_eq!(config.output, None);
        assert_eq!(config.output_path(), PathBuf::from("data/births.csv"));
    }

    #[test]
    fn test_explicit_paths() {
        let config = ConvertConfig::new("births.dat")
            .output("out/result.csv")
            .mapping("specs/natality.yaml");
        assert_eq!(config.output_path(), PathBuf::from("out/result.csv"));
        assert_eq!(config.mapping, PathBuf::from("specs/natality.yaml"));
    }

    #[test]
    fn test_default_output_path_variants() {
        assert_eq!(
            default_output_path(Path::new("births")),
            PathBuf::from("births.csv")
        );
        assert_eq!(
            default_output_path(Path::new("natl2019.us.dat")),
            PathBuf::from("natl2019.us.csv")
        );
        assert_eq!(
            default_output_path(Path::new("already.csv")),
            PathBuf::from("already.csv")
        );
    }
}
