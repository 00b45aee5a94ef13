use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

/// Backend record shape: one JSON object per row.
pub type JsonMap = serde_json::Map<String, Value>;

/// A single cell value. Checkbox columns hold flags, everything else is
/// kept as display text (selects included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Flag(_) => "",
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(_) => false,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Flag(b) => Value::Bool(*b),
        }
    }

    fn from_json(value: &Value) -> FieldValue {
        match value {
            Value::Bool(b) => FieldValue::Flag(*b),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Null => FieldValue::Text(String::new()),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

/// One master-data row: a stable client key plus its field values.
///
/// The key is the server's natural key when it provides one; rows the
/// server returns without one get a random token so the table can still
/// address them.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Row {
    pub fn new(key: impl Into<String>) -> Self {
        Row {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Map a server record to a row, keyed by `key_field` when present.
    /// Numeric ids are accepted and stringified; id-keyed screens get
    /// backend-generated integer ids.
    pub fn from_record(key_field: &str, record: JsonMap) -> Self {
        let key = record
            .get(key_field)
            .and_then(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let fields = record
            .iter()
            .map(|(name, value)| (name.clone(), FieldValue::from_json(value)))
            .collect();
        Row { key, fields }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_text(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_field(field, FieldValue::Text(value.into()))
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Display text of a field, empty when absent or a flag.
    pub fn text(&self, field: &str) -> &str {
        self.fields.get(field).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn flag(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(FieldValue::as_flag)
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Full desired row state for an upsert call: every field, changed and
    /// unchanged, merged into one record. The backend overwrites by natural
    /// key, so partial patches are never sent.
    pub fn to_record(&self) -> JsonMap {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}
