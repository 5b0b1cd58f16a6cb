//! # Form Records — Nested Path Addressing
//!
//! A `FormRecord` is the nested mapping that holds a form's values. Its
//! shape mirrors the schema's section nesting: a field `city` inside a
//! section `address` lives at `record["address"]["city"]`.
//!
//! ## Semantics
//!
//! - [`FormRecord::get`] walks the path and yields `None` as soon as a
//!   segment is missing or an intermediate node is `null` or not a mapping.
//! - [`FormRecord::with_value`] returns a fresh record with the value
//!   written, so previously handed-out records never change underneath
//!   their holders. [`FormRecord::insert`] is the in-place variant, used
//!   when building a record that nobody else has seen yet.
//! - Writing never fails. Missing intermediates are created; an
//!   intermediate that holds a scalar is replaced by a mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::FieldPath;

/// Nested mapping of field values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord(Map<String, Value>);

impl FormRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Whether the record has no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read the value at `path`.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = &self.0;
        for segment in parents {
            current = current.get(segment)?.as_object()?;
        }
        current.get(last)
    }

    /// Return a copy of this record with `value` written at `path`.
    #[must_use]
    pub fn with_value(&self, path: &FieldPath, value: Value) -> Self {
        let mut next = self.clone();
        next.insert(path, value);
        next
    }

    /// Write `value` at `path` in place, creating intermediate mappings.
    pub fn insert(&mut self, path: &FieldPath, value: Value) {
        let Some((last, parents)) = path.segments().split_last() else {
            return;
        };
        let mut current = &mut self.0;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot.as_object_mut() {
                Some(map) => map,
                None => return,
            };
        }
        current.insert(last.clone(), value);
    }
}

impl From<Map<String, Value>> for FormRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<FormRecord> for Value {
    fn from(record: FormRecord) -> Self {
        record.into_value()
    }
}

impl TryFrom<Value> for FormRecord {
    type Error = Value;

    /// Accepts only JSON objects; anything else is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
