//! # Structured Records
//!
//! A schema-free, ordered, nested key/value model used for confirmation
//! display. Forms flatten their state into a [`StructuredRecord`] and hand it
//! to [`crate::render`]; nothing here is persisted.
//!
//! ## Shape
//! ```text
//! StructuredRecord ── ordered (field, StructuredValue) pairs
//!
//! StructuredValue
//! ├── Primitive(Text | Integer | Float | Bool)
//! ├── Record(StructuredRecord)
//! └── List(Vec<StructuredValue>)
//! ```
//!
//! The tree is owned, so cycles cannot be built.
//!
//! ## Untyped Input
//! `serde_json::Value` converts losslessly except for `null`, which has no
//! variant of its own and becomes empty text.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Primitive
// =============================================================================

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Text(s) => f.write_str(s),
            Primitive::Integer(n) => write!(f, "{n}"),
            Primitive::Float(x) => write!(f, "{x}"),
            Primitive::Bool(b) => write!(f, "{b}"),
        }
    }
}

// =============================================================================
// Structured Value
// =============================================================================

/// A node in a structured record tree.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    Primitive(Primitive),
    Record(StructuredRecord),
    List(Vec<StructuredValue>),
}

impl StructuredValue {
    /// Shorthand for a text primitive.
    pub fn text(value: impl Into<String>) -> Self {
        StructuredValue::Primitive(Primitive::Text(value.into()))
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            StructuredValue::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&StructuredRecord> {
        match self {
            StructuredValue::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Primitive> for StructuredValue {
    fn from(value: Primitive) -> Self {
        StructuredValue::Primitive(value)
    }
}

impl From<&str> for StructuredValue {
    fn from(value: &str) -> Self {
        StructuredValue::text(value)
    }
}

impl From<String> for StructuredValue {
    fn from(value: String) -> Self {
        StructuredValue::text(value)
    }
}

impl From<&String> for StructuredValue {
    fn from(value: &String) -> Self {
        StructuredValue::text(value.as_str())
    }
}

impl From<i64> for StructuredValue {
    fn from(value: i64) -> Self {
        StructuredValue::Primitive(Primitive::Integer(value))
    }
}

impl From<i32> for StructuredValue {
    fn from(value: i32) -> Self {
        StructuredValue::Primitive(Primitive::Integer(i64::from(value)))
    }
}

impl From<f64> for StructuredValue {
    fn from(value: f64) -> Self {
        StructuredValue::Primitive(Primitive::Float(value))
    }
}

impl From<bool> for StructuredValue {
    fn from(value: bool) -> Self {
        StructuredValue::Primitive(Primitive::Bool(value))
    }
}

/// Dates travel as RFC 3339 text.
impl From<DateTime<Utc>> for StructuredValue {
    fn from(value: DateTime<Utc>) -> Self {
        StructuredValue::text(value.to_rfc3339())
    }
}

/// Money is shown the way the forms show it: grouped digits, no prefix.
impl From<Money> for StructuredValue {
    fn from(value: Money) -> Self {
        StructuredValue::text(value.to_grouped())
    }
}

impl From<StructuredRecord> for StructuredValue {
    fn from(value: StructuredRecord) -> Self {
        StructuredValue::Record(value)
    }
}

impl<T: Into<StructuredValue>> From<Vec<T>> for StructuredValue {
    fn from(values: Vec<T>) -> Self {
        StructuredValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StructuredValue>> From<Option<T>> for StructuredValue {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(|| StructuredValue::text(""), Into::into)
    }
}

impl From<serde_json::Value> for StructuredValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            // No variant for "nothing": show it as blank text.
            Value::Null => StructuredValue::text(""),
            Value::Bool(b) => b.into(),
            Value::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                None => match n.as_f64() {
                    Some(x) => x.into(),
                    None => StructuredValue::text(n.to_string()),
                },
            },
            Value::String(s) => s.into(),
            Value::Array(items) => {
                StructuredValue::List(items.into_iter().map(StructuredValue::from).collect())
            }
            Value::Object(map) => StructuredValue::Record(map.into()),
        }
    }
}

// =============================================================================
// Structured Record
// =============================================================================

/// An ordered mapping from field name to value.
///
/// Iteration order is insertion order. Inserting an existing field replaces
/// its value without moving it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredRecord {
    fields: Vec<(String, StructuredValue)>,
}

impl StructuredRecord {
    pub fn new() -> Self {
        StructuredRecord::default()
    }

    /// Builder-style insert.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::structured::StructuredRecord;
    ///
    /// let record = StructuredRecord::new()
    ///     .with("productCode", "A1")
    ///     .with("quantity", 2);
    /// assert_eq!(record.len(), 2);
    /// ```
    pub fn with(mut self, field: impl Into<String>, value: impl Into<StructuredValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts or replaces a field, returning the previous value.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<StructuredValue>,
    ) -> Option<StructuredValue> {
        let field = field.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((field, value));
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&StructuredValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StructuredValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for StructuredRecord
where
    K: Into<String>,
    V: Into<StructuredValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = StructuredRecord::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

/// Keeps the JSON object's order (serde_json is built with `preserve_order`).
impl From<serde_json::Map<String, serde_json::Value>> for StructuredRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

// =============================================================================
// Serialization
// =============================================================================
// Serialized as plain JSON (objects in field order) so a confirmation
// payload can be logged as-is.

impl Serialize for Primitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Primitive::Text(s) => serializer.serialize_str(s),
            Primitive::Integer(n) => serializer.serialize_i64(*n),
            Primitive::Float(x) => serializer.serialize_f64(*x),
            Primitive::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl Serialize for StructuredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StructuredValue::Primitive(p) => p.serialize(serializer),
            StructuredValue::Record(r) => r.serialize(serializer),
            StructuredValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for StructuredRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insertion_order_is_kept() {
        let record = StructuredRecord::new()
            .with("c", 1)
            .with("a", 2)
            .with("b", 3);

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut record = StructuredRecord::new().with("a", 1).with("b", 2);
        let previous = record.insert("a", 99);

        assert_eq!(previous, Some(StructuredValue::from(1)));
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&StructuredValue::from(99)));
    }

    #[test]
    fn test_from_json_preserves_order_and_nesting() {
        let value = json!({
            "zeta": "z",
            "items": [{"productCode": "A1", "qty": 2}],
            "alpha": null
        });

        let StructuredValue::Record(record) = StructuredValue::from(value) else {
            panic!("expected a record");
        };

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "items", "alpha"]);
        assert_eq!(record.get("alpha"), Some(&StructuredValue::text("")));

        let Some(StructuredValue::List(items)) = record.get("items") else {
            panic!("expected a list");
        };
        let first = items[0].as_record().unwrap();
        assert_eq!(first.get("qty"), Some(&StructuredValue::from(2)));
    }

    #[test]
    fn test_primitive_display() {
        assert_eq!(Primitive::Integer(42).to_string(), "42");
        assert_eq!(Primitive::Float(2.5).to_string(), "2.5");
        assert_eq!(Primitive::Bool(false).to_string(), "false");
        assert_eq!(Primitive::Text("x".into()).to_string(), "x");
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let record = StructuredRecord::new()
            .with("b", 1)
            .with("a", vec!["x", "y"]);

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"b":1,"a":["x","y"]}"#);
    }
}
