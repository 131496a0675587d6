//! # nber-translate
//!
//! Line translation engine for fixed-width data.
//!
//! Each data line is sliced according to the loaded field mappings, every
//! slice is resolved against its value map, and the results are joined into
//! a CSV row. Rows are collected into a [`CsvDocument`] and written in one go.
//!
//! ## Example Usage
//!
//! ```rust
//! use nber_mapping::MappingLoader;
//! use nber_translate::{CsvDocument, build_header, translate_line};
//!
//! let mappings = MappingLoader::new()
//!     .load_from_json(
//!         r#"{"translations": [
//!             {"key": "sex", "location": {"start": 1, "end": 1}, "value_map": {"1": "M"}},
//!             {"key": "age", "location": {"start": 2, "end": 3}, "value_map": {}}
//!         ]}"#,
//!     )
//!     .unwrap();
//!
//! assert_eq!(build_header(&mappings), "sex,age");
//!
//! let line = translate_line("134", &mappings, 0).unwrap();
//! assert_eq!(line.row(), "M,34");
//!
//! let mut document = CsvDocument::from_mappings(&mappings);
//! document.push_line(line);
//! assert_eq!(document.to_csv_string().unwrap(), "sex,age\nM,34\n");
//! ```

pub mod document;
pub mod errors;
pub mod translator;

pub use document::CsvDocument;
pub use errors::{TranslateError, TranslateResult};
pub use translator::{
    DELIMITER, LineTranslator, MissingTranslation, TranslatedLine, build_header, translate_line,
};
