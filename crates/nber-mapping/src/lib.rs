//! # nber-mapping
//!
//! Field-mapping model and loader for fixed-width to CSV conversion.
//!
//! A mapping file declares, for every output column, the CSV key, the
//! 1-indexed inclusive character range it occupies in each input line, and a
//! value map translating coded values into readable ones:
//!
//! ```rust
//! use nber_mapping::MappingLoader;
//!
//! let json = r#"{
//!     "translations": [
//!         {"key": "sex", "location": {"start": 1, "end": 1}, "value_map": {"1": "M", "2": "F"}}
//!     ]
//! }"#;
//!
//! let mappings = MappingLoader::new().load_from_json(json).unwrap();
//! assert_eq!(mappings.keys().collect::<Vec<_>>(), vec!["sex"]);
//! ```

pub mod loader;
pub mod model;

pub use loader::{DEFAULT_MAPPING_PATH, MappingLoader, TRANSLATIONS_KEY};
pub use model::{FieldMapping, Location, MappingSet};

use thiserror::Error;

/// Errors that can occur when loading a mapping specification
#[derive(Error, Debug)]
pub enum Error {
    #[error("Mapping specification has no '{0}' collection")]
    MissingCollection(String),

    #[error("Translation entry {index} is missing field(s): {}", .fields.join(", "))]
    MissingFields { index: usize, fields: Vec<String> },

    #[error("Invalid location for '{key}': {message}")]
    InvalidLocation { key: String, message: String },

    #[error("Duplicate translation key: {0}")]
    DuplicateKey(String),

    #[error("Invalid mapping format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error comes from the mapping content rather than from
    /// reading the file
    pub fn is_config(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
