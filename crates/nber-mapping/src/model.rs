//! Field-mapping model definitions

use std::collections::HashMap;

/// A 1-indexed, inclusive character range within an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    start: usize,
    end: usize,
}

impl Location {
    /// Create a location. Callers are expected to have checked
    /// `1 <= start <= end`; the loader does.
    pub(crate) fn new(start: usize, end: usize) -> Self {
        debug_assert!(start >= 1 && end >= start);
        Self { start, end }
    }

    /// First column of the field (1-indexed)
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last column of the field (1-indexed, inclusive)
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of characters the field declares
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    /// Zero-indexed offset of the first character
    pub fn offset(&self) -> usize {
        self.start - 1
    }
}

/// One output column: where to read it from and how to translate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    key: String,
    location: Location,
    value_map: HashMap<String, String>,
}

impl FieldMapping {
    pub(crate) fn new(
        key: impl Into<String>,
        location: Location,
        value_map: HashMap<String, String>,
    ) -> Self {
        Self {
            key: key.into(),
            location,
            value_map,
        }
    }

    /// CSV column name
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Translation table for coded values. An empty map means the field is
    /// passed through untranslated.
    pub fn value_map(&self) -> &HashMap<String, String> {
        &self.value_map
    }

    /// Look up the translation of a raw value
    pub fn translate(&self, raw: &str) -> Option<&str> {
        self.value_map.get(raw).map(String::as_str)
    }

    pub fn has_translations(&self) -> bool {
        !self.value_map.is_empty()
    }
}

/// The ordered set of field mappings for a conversion run.
///
/// Order is significant: it is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSet {
    mappings: Vec<FieldMapping>,
}

impl MappingSet {
    pub(crate) fn new(mappings: Vec<FieldMapping>) -> Self {
        Self { mappings }
    }

    /// Keys in column order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.mappings.iter().map(FieldMapping::key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldMapping> {
        self.mappings.iter()
    }

    /// Find a mapping by key
    pub fn get(&self, key: &str) -> Option<&FieldMapping> {
        self.mappings.iter().find(|m| m.key == key)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl<'a> IntoIterator for &'a MappingSet {
    type Item = &'a FieldMapping;
    type IntoIter = std::slice::Iter<'a, FieldMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sex_mapping() -> FieldMapping {
        let value_map = HashMap::from([
            ("1".to_string(), "M".to_string()),
            ("2".to_string(), "F".to_string()),
        ]);
        FieldMapping::new("sex", Location::new(1, 1), value_map)
    }

    #[test]
    fn test_location_offsets() {
        let location = Location::new(2, 3);
        assert_eq!(location.offset(), 1);
        assert_eq!(location.width(), 2);
        assert_eq!(location.start(), 2);
        assert_eq!(location.end(), 3);
    }

    #[test]
    fn test_field_mapping_translate() {
        let mapping = sex_mapping();
        assert_eq!(mapping.translate("1"), Some("M"));
        assert_eq!(mapping.translate("9"), None);
        assert!(mapping.has_translations());
    }

    #[test]
    fn test_mapping_set_preserves_order() {
        let set = MappingSet::new(vec![
            FieldMapping::new("b", Location::new(1, 1), HashMap::new()),
            FieldMapping::new("a", Location::new(2, 2), HashMap::new()),
        ]);
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().map(|m| m.location().start()).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(set.get("a").is_some());
        assert!(set.get("c").is_none());
    }
}
