//! Schema-flexible record model for the document store.
//!
//! A stored order is a [`Document`]: field name to [`Value`], where `Value` is
//! a closed variant covering everything the store can hold. The wire
//! serializer lives here too: it is the only place that knows how internal
//! ids and timestamps become externally-safe JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value as JsonValue};

use crate::domain::order::OrderId;

/// Field under which the store keeps its internal identifier.
pub const ID_FIELD: &str = "_id";

/// Everything a stored field can be.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Id(OrderId),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Document),
}

/// One stored record: an ordered map of field name to [`Value`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document(BTreeMap<String, Value>);

impl Value {
    /// Wire rendering: ids and timestamps become strings, everything else
    /// maps onto the corresponding JSON shape.
    pub fn to_wire(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => json!(b),
            Value::Int(i) => json!(i),
            Value::Float(f) => json!(f),
            Value::String(s) => json!(s),
            Value::Id(id) => json!(id.as_str()),
            Value::Timestamp(t) => json!(t.to_rfc3339_opts(SecondsFormat::Micros, false)),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_wire).collect()),
            Value::Object(doc) => doc.to_wire(),
        }
    }

    /// Lift plain JSON into the value model. No field is revived as an id or
    /// timestamp; this is for subtrees (like line items) that contain neither.
    pub fn from_json(json: JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(map) => {
                let mut doc = Document::new();
                for (k, v) in map {
                    doc.insert(k, Value::from_json(v));
                }
                Value::Object(doc)
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert, for literal documents.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key) {
            Some(Value::Timestamp(t)) => Some(*t),
            _ => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// The store-assigned id, if this document has been inserted.
    pub fn id(&self) -> Option<&OrderId> {
        match self.get(ID_FIELD) {
            Some(Value::Id(id)) => Some(id),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Convert a stored record to its wire form.
    ///
    /// The internal `_id` field is re-emitted as a stringified `id`; every
    /// timestamp anywhere in the tree renders as an RFC 3339 string with an
    /// explicit UTC offset. The output contains only plain JSON shapes.
    pub fn to_wire(&self) -> JsonValue {
        let mut out = serde_json::Map::with_capacity(self.0.len());
        if let Some(id) = self.get(ID_FIELD) {
            out.insert("id".to_string(), id.to_wire());
        }
        for (k, v) in &self.0 {
            if k != ID_FIELD {
                out.insert(k.clone(), v.to_wire());
            }
        }
        JsonValue::Object(out)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<OrderId> for Value {
    fn from(id: OrderId) -> Self {
        Value::Id(id)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc)
    }
}

impl From<Vec<Document>> for Value {
    fn from(docs: Vec<Document>) -> Self {
        Value::Array(docs.into_iter().map(Value::Object).collect())
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Document {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        Document::new()
            .with(ID_FIELD, OrderId::generate())
            .with("order_number", "ORD-1001")
            .with("total_amount", 89.5)
            .with(
                "items",
                vec![Document::new()
                    .with("product_name", "Hydra Glow Serum")
                    .with("quantity", 1_i64)
                    .with("price", 65.0)],
            )
            .with("created_at", created)
            .with("updated_at", created)
    }

    #[test]
    fn wire_form_renames_id_and_stringifies_it() {
        let doc = sample();
        let id = doc.id().unwrap().to_string();
        let wire = doc.to_wire();
        assert!(wire.get("_id").is_none());
        assert_eq!(wire["id"], JsonValue::String(id));
    }

    #[test]
    fn wire_form_renders_timestamps_with_utc_offset() {
        let wire = sample().to_wire();
        let created = wire["created_at"].as_str().unwrap();
        assert_eq!(created, "2024-05-01T12:30:00.000000+00:00");
        assert_eq!(wire["updated_at"], wire["created_at"]);
    }

    #[test]
    fn wire_form_passes_nested_values_through() {
        let wire = sample().to_wire();
        assert_eq!(wire["total_amount"], json!(89.5));
        assert_eq!(wire["items"][0]["quantity"], json!(1));
        assert_eq!(wire["items"][0]["product_name"], json!("Hydra Glow Serum"));
    }

    #[test]
    fn serialization_is_idempotent() {
        let doc = sample();
        assert_eq!(doc.to_wire(), doc.to_wire());
    }

    #[test]
    fn from_json_round_trips_plain_shapes() {
        let json = json!({"a": [1, 2.5, "x", null, true], "b": {"c": "d"}});
        let value = Value::from_json(json.clone());
        assert_eq!(value.to_wire(), json);
    }
}
