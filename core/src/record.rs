//! Schema-light records parsed out of corpus files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{BrainError, Result};

/// Field holding raw text when a file could not be parsed as JSON.
pub const RAW_TEXT_FIELD: &str = "content";
/// Field added to fallback matches naming the file they came from.
pub const SOURCE_FIELD: &str = "_source";

/// A string-keyed mapping. Field access goes through typed getters so that
/// "does this record have a title" is an explicit question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Non-object values carry no addressable fields and become empty records.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Wrap unparsable file content as a single free-text record.
    pub fn raw_text(text: &str) -> Self {
        let mut map = Map::new();
        map.insert(RAW_TEXT_FIELD.to_string(), Value::String(text.to_string()));
        Self(map)
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|v| !v.is_null())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Field rendered as searchable text: strings verbatim, arrays joined by
    /// spaces, objects serialized.
    pub fn field_text(&self, field: &str) -> Option<String> {
        self.get(field).map(value_text)
    }

    /// Identifier used for traceability: `id`, then `name`, then `title`.
    pub fn identifier(&self) -> Option<String> {
        ["id", "name", "title"].iter().find_map(|f| match self.get(f)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn insert(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse file content as one JSON value. A top-level array yields one record
/// per element; anything else is a single record.
pub fn parse_str(content: &str) -> std::result::Result<Vec<Record>, serde_json::Error> {
    let json: Value = serde_json::from_str(content)?;
    Ok(match json {
        Value::Array(items) => items.into_iter().map(Record::from_value).collect(),
        other => vec![Record::from_value(other)],
    })
}

/// Read and parse a file. Extension is ignored: `.cbor` and `.bin` files are
/// attempted as JSON text too.
pub fn parse_file(path: &Path) -> Result<Vec<Record>> {
    let content = read_text(path)?;
    parse_str(&content).map_err(|source| BrainError::FileParse { path: path.to_path_buf(), source })
}

/// Like [`parse_file`], but content that is not JSON comes back as a single
/// raw-text record instead of an error.
pub fn parse_file_lenient(path: &Path) -> Result<Vec<Record>> {
    let content = read_text(path)?;
    match parse_str(&content) {
        Ok(records) => Ok(records),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "wrapping unparsable file as raw text");
            Ok(vec![Record::raw_text(&content)])
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| BrainError::Io { path: path.to_path_buf(), source })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_yields_one_record_per_element() {
        let records = parse_str(r#"[{"name":"a"},{"name":"b"},{"name":"c"}]"#).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].get_str("name"), Some("c"));
    }

    #[test]
    fn object_is_a_single_record() {
        let records = parse_str(r#"{"title":"Intro"}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].has("title"));
        assert!(!records[0].has("body"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_str("{not json").is_err());
    }

    #[test]
    fn field_text_flattens_arrays_and_objects() {
        let rec = Record::from_value(json!({
            "tags": ["widget", "create", 3],
            "meta": {"owner": "core"},
            "empty": null
        }));
        assert_eq!(rec.field_text("tags").as_deref(), Some("widget create 3"));
        assert_eq!(rec.field_text("meta").as_deref(), Some(r#"{"owner":"core"}"#));
        assert_eq!(rec.field_text("empty"), None);
        assert!(!rec.has("empty"));
    }

    #[test]
    fn identifier_prefers_id() {
        let rec = Record::from_value(json!({"id": 42, "name": "Widget"}));
        assert_eq!(rec.identifier().as_deref(), Some("42"));
        let rec = Record::from_value(json!({"title": "Guide"}));
        assert_eq!(rec.identifier().as_deref(), Some("Guide"));
        assert_eq!(Record::default().identifier(), None);
    }
}
