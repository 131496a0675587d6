//! Line translation engine
//!
//! Slices each fixed-width field out of a data line, resolves it against the
//! field's value map and joins the results into a CSV row. Values missing from
//! a non-empty value map are passed through verbatim and reported as
//! [`MissingTranslation`] warnings; an empty value map passes values through
//! silently.

use std::fmt;

use nber_mapping::{FieldMapping, Location, MappingSet};
use tracing::trace;

use crate::errors::{TranslateError, TranslateResult};

/// Separator between CSV columns
pub const DELIMITER: char = ',';

/// A coded value with no entry in its field's value map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslation {
    /// Zero-based index of the input line
    pub line: usize,
    pub key: String,
    /// The raw value that was passed through
    pub value: String,
}

impl fmt::Display for MissingTranslation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {} missing translation for {}: {}",
            self.line, self.key, self.value
        )
    }
}

/// The translated values of one data line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedLine {
    index: usize,
    values: Vec<String>,
    warnings: Vec<MissingTranslation>,
}

impl TranslatedLine {
    /// Zero-based index of the source line
    pub fn index(&self) -> usize {
        self.index
    }

    /// Translated values in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Warnings raised while translating, in column order
    pub fn warnings(&self) -> &[MissingTranslation] {
        &self.warnings
    }

    /// The CSV row, without a trailing newline
    pub fn row(&self) -> String {
        join_fields(self.values.iter().map(String::as_str))
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<MissingTranslation>) {
        (self.values, self.warnings)
    }
}

/// Comma-join the mapping keys in column order
pub fn build_header(mappings: &MappingSet) -> String {
    join_fields(mappings.keys())
}

fn join_fields<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let mut joined = String::new();
    for (i, field) in fields.enumerate() {
        if i > 0 {
            joined.push(DELIMITER);
        }
        joined.push_str(field);
    }
    joined
}

/// Translate one data line.
///
/// `line_index` is the zero-based position of the line in the input and is
/// only used for error and warning context.
pub fn translate_line(
    line: &str,
    mappings: &MappingSet,
    line_index: usize,
) -> TranslateResult<TranslatedLine> {
    let mut values = Vec::with_capacity(mappings.len());
    let mut warnings = Vec::new();

    for mapping in mappings {
        let raw = extract(line, mapping.location());
        if raw.is_empty() {
            return Err(TranslateError::location(
                line_index,
                mapping.key(),
                mapping.location().start(),
                line.chars().count(),
            ));
        }

        values.push(resolve(raw, mapping, line_index, &mut warnings));
    }

    Ok(TranslatedLine {
        index: line_index,
        values,
        warnings,
    })
}

fn resolve(
    raw: &str,
    mapping: &FieldMapping,
    line_index: usize,
    warnings: &mut Vec<MissingTranslation>,
) -> String {
    if let Some(translated) = mapping.translate(raw) {
        trace!(line = line_index, key = mapping.key(), raw, translated, "Translated field");
        return translated.to_string();
    }

    if mapping.has_translations() {
        warnings.push(MissingTranslation {
            line: line_index,
            key: mapping.key().to_string(),
            value: raw.to_string(),
        });
    }
    trace!(line = line_index, key = mapping.key(), raw, "Passed field through");
    raw.to_string()
}

/// Slice the characters covered by `location`. A range that runs past the end
/// of the line is cut short; one that starts past the end yields "".
fn extract(line: &str, location: Location) -> &str {
    let mut boundaries = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));

    let Some(begin) = boundaries.nth(location.offset()) else {
        return "";
    };
    let end = boundaries
        .nth(location.width() - 1)
        .unwrap_or(line.len());

    &line[begin..end]
}

/// Translates lines against a borrowed mapping set
#[derive(Debug, Clone, Copy)]
pub struct LineTranslator<'a> {
    mappings: &'a MappingSet,
}

impl<'a> LineTranslator<'a> {
    pub fn new(mappings: &'a MappingSet) -> Self {
        Self { mappings }
    }

    /// The header row
    pub fn header(&self) -> String {
        build_header(self.mappings)
    }

    /// Header fields in column order
    pub fn header_fields(&self) -> Vec<String> {
        self.mappings.keys().map(str::to_string).collect()
    }

    /// Translate a single line
    pub fn translate(&self, line: &str, line_index: usize) -> TranslateResult<TranslatedLine> {
        translate_line(line, self.mappings, line_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nber_mapping::MappingLoader;

    fn mappings(json: &str) -> MappingSet {
        MappingLoader::new().load_from_json(json).unwrap()
    }

    fn sex_only() -> MappingSet {
        mappings(
            r#"{"translations": [
                {"key": "sex", "location": {"start": 1, "end": 1}, "value_map": {"1": "M", "2": "F"}}
            ]}"#,
        )
    }

    fn sex_and_age() -> MappingSet {
        mappings(
            r#"{"translations": [
                {"key": "sex", "location": {"start": 1, "end": 1}, "value_map": {"1": "M"}},
                {"key": "age", "location": {"start": 2, "end": 3}, "value_map": {}}
            ]}"#,
        )
    }

    #[test]
    fn test_header_follows_mapping_order() {
        let set = mappings(
            r#"{"translations": [
                {"key": "state", "location": {"start": 5, "end": 6}, "value_map": {}},
                {"key": "sex", "location": {"start": 1, "end": 1}, "value_map": {}},
                {"key": "age", "location": {"start": 2, "end": 3}, "value_map": {}}
            ]}"#,
        );
        assert_eq!(build_header(&set), "state,sex,age");
    }

    #[test]
    fn test_header_of_empty_set() {
        let set = mappings(r#"{"translations": []}"#);
        assert_eq!(build_header(&set), "");
    }

    #[test]
    fn test_translated_value() {
        let set = sex_only();
        assert_eq!(build_header(&set), "sex");

        let line = translate_line("1", &set, 0).unwrap();
        assert_eq!(line.row(), "M");
        assert!(line.warnings().is_empty());
    }

    #[test]
    fn test_untranslated_value_warns() {
        let line = translate_line("9", &sex_only(), 0).unwrap();
        assert_eq!(line.row(), "9");
        assert_eq!(line.warnings().len(), 1);
        assert_eq!(
            line.warnings()[0].to_string(),
            "Line 0 missing translation for sex: 9"
        );
    }

    #[test]
    fn test_multi_field_line() {
        let line = translate_line("134", &sex_and_age(), 0).unwrap();
        assert_eq!(line.row(), "M,34");
        assert_eq!(line.values(), ["M", "34"]);
        assert!(line.warnings().is_empty());
    }

    #[test]
    fn test_empty_value_map_passes_through_silently() {
        let line = translate_line("1xy", &sex_and_age(), 3).unwrap();
        assert_eq!(line.values()[1], "xy");
        assert!(line.warnings().is_empty());
    }

    #[test]
    fn test_warning_carries_line_index() {
        let line = translate_line("277", &sex_and_age(), 12).unwrap();
        assert_eq!(line.index(), 12);
        assert_eq!(line.row(), "2,77");
        assert_eq!(
            line.warnings(),
            [MissingTranslation {
                line: 12,
                key: "sex".to_string(),
                value: "2".to_string(),
            }]
        );
    }

    #[test]
    fn test_line_shorter_than_start_fails() {
        let err = translate_line("1", &sex_and_age(), 7).unwrap_err();
        assert_eq!(err, TranslateError::location(7, "age", 2, 1));
        assert_eq!(err.line_number(), Some(7));
    }

    #[test]
    fn test_empty_line_fails_on_first_field() {
        let err = translate_line("", &sex_and_age(), 0).unwrap_err();
        match err {
            TranslateError::Location { key, length, .. } => {
                assert_eq!(key, "sex");
                assert_eq!(length, 0);
            }
            e => panic!("Expected Location error, got {:?}", e),
        }
    }

    #[test]
    fn test_range_past_end_is_truncated() {
        let line = translate_line("13", &sex_and_age(), 0).unwrap();
        assert_eq!(line.row(), "M,3");
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let set = mappings(
            r#"{"translations": [
                {"key": "a", "location": {"start": 1, "end": 1}, "value_map": {}},
                {"key": "b", "location": {"start": 2, "end": 3}, "value_map": {"éü": "ok"}}
            ]}"#,
        );
        let line = translate_line("xéü", &set, 0).unwrap();
        assert_eq!(line.row(), "x,ok");
    }

    #[test]
    fn test_overlapping_fields() {
        let set = mappings(
            r#"{"translations": [
                {"key": "full", "location": {"start": 1, "end": 4}, "value_map": {}},
                {"key": "year", "location": {"start": 3, "end": 4}, "value_map": {}}
            ]}"#,
        );
        let line = translate_line("1999", &set, 0).unwrap();
        assert_eq!(line.row(), "1999,99");
    }

    #[test]
    fn test_line_translator() {
        let set = sex_and_age();
        let translator = LineTranslator::new(&set);
        assert_eq!(translator.header(), "sex,age");
        assert_eq!(translator.header_fields(), vec!["sex", "age"]);

        let line = translator.translate("134", 5).unwrap();
        let (values, warnings) = line.into_parts();
        assert_eq!(values, vec!["M", "34"]);
        assert!(warnings.is_empty());
    }
}
