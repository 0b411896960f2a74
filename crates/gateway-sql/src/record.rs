//! Insert/update payload → column/value record.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Column → value mapping ready for a statement builder.
///
/// Columns are kept sorted so generated column lists are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(column.into(), value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.values
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Build a record from an untyped payload.
///
/// Every key/value pair is copied as is. Neither keys nor values are checked
/// against the schema; column names are validated when a statement is built.
///
/// # Errors
///
/// Returns `InvalidPayload` when the payload is not an object.
pub fn build_record(payload: &Value) -> Result<Record> {
    let map = match payload {
        Value::Object(map) => map,
        _ => {
            return Err(GatewayError::InvalidPayload(
                "incorrect insert object provided".to_string(),
            ))
        }
    };

    let mut record = Record::new();
    for (key, value) in map {
        record.insert(key.clone(), value.clone());
    }
    Ok(record)
}

/// Build records from a single object or an array of objects.
///
/// # Errors
///
/// Returns `InvalidPayload` when the payload, or any array element, is not
/// an object.
pub fn build_records(payload: &Value) -> Result<Vec<Record>> {
    match payload {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                build_record(item).map_err(|e| match e {
                    GatewayError::InvalidPayload(msg) => {
                        GatewayError::InvalidPayload(format!("element {}: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect(),
        single => Ok(vec![build_record(single)?]),
    }
}
