//! Mapping loader with presence validation

use crate::model::{FieldMapping, Location, MappingSet};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, trace};

/// Name of the top-level collection holding the field mappings
pub const TRANSLATIONS_KEY: &str = "translations";

/// Mapping file looked up in the working directory when none is given
pub const DEFAULT_MAPPING_PATH: &str = "translations.json";

const ENTRY_FIELDS: [&str; 3] = ["key", "location", "value_map"];
const LOCATION_FIELDS: [&str; 2] = ["start", "end"];

/// Serializable translation entry, deserialized once presence has been checked
#[derive(Debug, Deserialize)]
struct EntryFile {
    key: String,
    location: LocationFile,
    value_map: HashMap<String, String>,
}

/// Offsets are kept as raw JSON so that strings and floats are rejected
/// instead of coerced
#[derive(Debug, Deserialize)]
struct LocationFile {
    start: Value,
    end: Value,
}

/// Loads and validates a mapping specification
#[derive(Debug, Default, Clone, Copy)]
pub struct MappingLoader;

impl MappingLoader {
    /// Create a new mapping loader
    pub fn new() -> Self {
        Self
    }

    /// Load mappings from a file; `.yaml`/`.yml` files are read as YAML,
    /// everything else as JSON
    pub fn load_from_file(&self, path: &Path) -> Result<MappingSet> {
        trace!("Loading mapping specification from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Load mappings from a JSON string
    pub fn load_from_json(&self, json: &str) -> Result<MappingSet> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {}", e)))?;
        self.load_from_value(document)
    }

    /// Load mappings from a YAML string
    pub fn load_from_yaml(&self, yaml: &str) -> Result<MappingSet> {
        let document: Value = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {}", e)))?;
        self.load_from_value(document)
    }

    /// Validate an already-parsed document and build the mapping set.
    ///
    /// Every entry must carry `key`, `location` and `value_map`, and every
    /// location `start` and `end`. Unknown extra attributes are ignored.
    pub fn load_from_value(&self, document: Value) -> Result<MappingSet> {
        let Value::Object(mut root) = document else {
            return Err(Error::MissingCollection(TRANSLATIONS_KEY.to_string()));
        };

        let entries = match root.remove(TRANSLATIONS_KEY) {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(Error::InvalidFormat(format!(
                    "'{}' must be a list, found {}",
                    TRANSLATIONS_KEY,
                    json_type(&other)
                )));
            }
            None => return Err(Error::MissingCollection(TRANSLATIONS_KEY.to_string())),
        };

        let mut seen = HashSet::with_capacity(entries.len());
        let mut mappings = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            check_presence(index, &entry)?;

            let entry: EntryFile = serde_json::from_value(entry).map_err(|e| {
                Error::InvalidFormat(format!("translation entry {}: {}", index, e))
            })?;
            let mapping = convert_entry(entry)?;

            if !seen.insert(mapping.key().to_string()) {
                return Err(Error::DuplicateKey(mapping.key().to_string()));
            }

            trace!(
                key = mapping.key(),
                start = mapping.location().start(),
                end = mapping.location().end(),
                codes = mapping.value_map().len(),
                "Loaded field mapping"
            );
            mappings.push(mapping);
        }

        debug!(field_count = mappings.len(), "Loaded mapping specification");
        Ok(MappingSet::new(mappings))
    }
}

/// Collect every required attribute the entry lacks, nested ones as
/// `location.start`
fn check_presence(index: usize, entry: &Value) -> Result<()> {
    let Value::Object(fields) = entry else {
        return Err(Error::InvalidFormat(format!(
            "translation entry {} must be an object, found {}",
            index,
            json_type(entry)
        )));
    };

    let mut missing: Vec<String> = missing_from(fields, &ENTRY_FIELDS)
        .map(str::to_string)
        .collect();

    match fields.get("location") {
        Some(Value::Object(location)) => missing.extend(
            missing_from(location, &LOCATION_FIELDS).map(|name| format!("location.{}", name)),
        ),
        Some(other) => {
            return Err(Error::InvalidFormat(format!(
                "translation entry {}: location must be an object, found {}",
                index,
                json_type(other)
            )));
        }
        None => {}
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingFields {
            index,
            fields: missing,
        })
    }
}

fn missing_from<'a>(
    fields: &'a Map<String, Value>,
    required: &'a [&'static str],
) -> impl Iterator<Item = &'static str> + 'a {
    required
        .iter()
        .copied()
        .filter(|name| !fields.contains_key(*name))
}

fn convert_entry(entry: EntryFile) -> Result<FieldMapping> {
    if entry.key.is_empty() {
        return Err(Error::InvalidFormat(
            "translation key must not be empty".to_string(),
        ));
    }

    let start = offset(&entry.key, "start", &entry.location.start)?;
    let end = offset(&entry.key, "end", &entry.location.end)?;

    if start < 1 {
        return Err(Error::InvalidLocation {
            key: entry.key,
            message: format!("start must be at least 1, got {}", start),
        });
    }
    if end < start {
        return Err(Error::InvalidLocation {
            key: entry.key,
            message: format!("end ({}) is before start ({})", end, start),
        });
    }

    Ok(FieldMapping::new(
        entry.key,
        Location::new(start, end),
        entry.value_map,
    ))
}

fn offset(key: &str, name: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| Error::InvalidLocation {
            key: key.to_string(),
            message: format!("{} must be a non-negative integer, found {}", name, value),
        })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
