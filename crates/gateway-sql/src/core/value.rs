//! Driver value types for result rows.
//!
//! Drivers decode result columns into one of the [`SqlValue`] representations.
//! Coercion (see [`crate::coerce`]) then rewrites them into the canonical set:
//! text, bool, 64-bit integer, 64-bit float and RFC3339 timestamp strings.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

/// A decoded driver value, one variant per representation a driver can hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,

    /// Boolean value.
    Bool(bool),

    /// 64-bit signed integer.
    I64(i64),

    /// 64-bit floating point.
    F64(f64),

    /// Text data.
    Text(String),

    /// Raw bytes, as returned by text-protocol drivers.
    Bytes(Vec<u8>),

    /// UUID/GUID value.
    Uuid(Uuid),

    /// Decimal value with arbitrary precision.
    Decimal(Decimal),

    /// Timestamp with timezone offset.
    DateTime(DateTime<FixedOffset>),

    /// Timestamp without timezone (interpreted as UTC).
    NaiveDateTime(NaiveDateTime),

    /// Document-store datetime: milliseconds since the Unix epoch.
    DocumentDateTime(i64),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short name of the representation, used in log lines and warnings.
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::I64(_) => "i64",
            SqlValue::F64(_) => "f64",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Uuid(_) => "uuid",
            SqlValue::Decimal(_) => "decimal",
            SqlValue::DateTime(_) => "datetime",
            SqlValue::NaiveDateTime(_) => "naive_datetime",
            SqlValue::DocumentDateTime(_) => "document_datetime",
        }
    }

    /// Convert to JSON for handing rows to the layer above.
    ///
    /// Bytes become a lossy UTF-8 string, timestamps an RFC3339 UTC string.
    pub fn to_json(&self) -> Value {
        match self {
            SqlValue::Null => Value::Null,
            SqlValue::Bool(v) => Value::Bool(*v),
            SqlValue::I64(v) => Value::from(*v),
            SqlValue::F64(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            SqlValue::Text(v) => Value::String(v.clone()),
            SqlValue::Bytes(v) => Value::String(String::from_utf8_lossy(v).into_owned()),
            SqlValue::Uuid(v) => Value::String(v.to_string()),
            SqlValue::Decimal(v) => Value::String(v.to_string()),
            SqlValue::DateTime(_) | SqlValue::NaiveDateTime(_) | SqlValue::DocumentDateTime(_) => {
                self.to_rfc3339().map(Value::String).unwrap_or(Value::Null)
            }
        }
    }

    /// Format a temporal value as an RFC3339 UTC string with second precision.
    ///
    /// Returns `None` for non-temporal values and for document datetimes
    /// outside chrono's representable range.
    pub fn to_rfc3339(&self) -> Option<String> {
        let utc = match self {
            SqlValue::DateTime(v) => v.with_timezone(&Utc),
            SqlValue::NaiveDateTime(v) => Utc.from_utc_datetime(v),
            SqlValue::DocumentDateTime(millis) => Utc.timestamp_millis_opt(*millis).single()?,
            _ => return None,
        };
        Some(format_rfc3339(&utc))
    }
}

/// RFC3339 with a `Z` suffix and no fractional seconds.
pub fn format_rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        SqlValue::Bytes(v.to_vec())
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<DateTime<FixedOffset>> for SqlValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        SqlValue::DateTime(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::DateTime(v.fixed_offset())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::NaiveDateTime(v)
    }
}

/// Driver-reported metadata for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    /// Column name as it appears in the row.
    pub name: String,

    /// Declared native type name (e.g. "TINYINT", "VARCHAR").
    pub native_type: String,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
        }
    }
}

/// One result row: column name → decoded value.
pub type Row = HashMap<String, SqlValue>;

/// Convert a row to a JSON object.
pub fn row_to_json(row: &Row) -> Value {
    Value::Object(
        row.iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_sql_value_is_null() {
        assert!(SqlValue::Null.is_null());
        assert!(!SqlValue::I64(42).is_null());
    }

    #[test]
    fn test_rfc3339_from_offset() {
        let ts = DateTime::parse_from_rfc3339("2023-05-01T12:00:00+02:00").unwrap();
        assert_eq!(
            SqlValue::DateTime(ts).to_rfc3339().as_deref(),
            Some("2023-05-01T10:00:00Z")
        );
    }

    #[test]
    fn test_rfc3339_from_naive_and_document() {
        let naive = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(
            SqlValue::NaiveDateTime(naive).to_rfc3339().as_deref(),
            Some("2023-05-01T10:00:00Z")
        );
        assert_eq!(
            SqlValue::DocumentDateTime(1_682_935_200_000).to_rfc3339().as_deref(),
            Some("2023-05-01T10:00:00Z")
        );
        assert!(SqlValue::I64(1).to_rfc3339().is_none());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(SqlValue::I64(7).to_json(), json!(7));
        assert_eq!(SqlValue::F64(f64::NAN).to_json(), Value::Null);
        assert_eq!(SqlValue::Bytes(b"abc".to_vec()).to_json(), json!("abc"));
        assert_eq!(
            SqlValue::Uuid(Uuid::nil()).to_json(),
            json!("00000000-0000-0000-0000-000000000000")
        );
    }

    #[test]
    fn test_row_to_json() {
        let mut row = Row::new();
        row.insert("id".to_string(), SqlValue::I64(1));
        row.insert("name".to_string(), "ada".into());
        assert_eq!(row_to_json(&row), json!({"id": 1, "name": "ada"}));
    }
}
