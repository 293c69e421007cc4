//! Ordered configuration documents and the base configuration object.
//!
//! Every object emitted into the Evergreen project file starts from the same
//! base fields (currently just `name`) and appends its own keys in a fixed
//! order. [`Document`] keeps insertion order so the emitted YAML/JSON matches
//! the order the fields were added in.

use serde_json::Value;

/// Insertion-ordered key/value document.
///
/// Backed by `serde_json::Map` with the `preserve_order` feature enabled.
pub type Document = serde_json::Map<String, Value>;

/// Something that serializes itself into an Evergreen configuration document.
pub trait ConfigObject {
    /// Identifier the orchestrator uses to reference this object.
    fn name(&self) -> &str;

    /// Fields every configuration object carries before its own.
    fn base_fields(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("name".to_owned(), Value::String(self.name().to_owned()));
        doc
    }

    /// Build the full document for this object.
    fn to_document(&self) -> Document;
}

/// Insert `value` under `key` unless it is absent or empty.
///
/// Empty strings, empty sequences, empty mappings, `null` and numeric zero
/// all count as empty and are omitted rather than emitted.
pub fn insert_present(doc: &mut Document, key: &str, value: Option<Value>) {
    if let Some(value) = value.filter(|v| !is_empty_value(v)) {
        doc.insert(key.to_owned(), value);
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
