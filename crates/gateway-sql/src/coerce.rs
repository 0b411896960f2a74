//! Result type coercion.
//!
//! Drivers hand back each column in whatever representation their protocol
//! uses: MySQL's text protocol returns bytes for every type, booleans are
//! `TINYINT`, and temporal types come back as driver-specific timestamps.
//! [`coerce_row`] rewrites a row in place so that every value is one of the
//! canonical kinds (text, bool, i64, f64, RFC3339 string).
//!
//! Coercion is best-effort. A value that fails to parse is logged, recorded
//! in the returned [`CoercionReport`], and left as it was; the rest of the
//! row is still coerced.
//!
//! Running coercion twice is a no-op the second time: coerced values are no
//! longer bytes, tinyint integers or temporal values. The reverse does not
//! hold across representations. An RFC3339 string handed back as bytes for a
//! MySQL `DATE` column fails the `YYYY-MM-DD HH:MM:SS` parse and stays bytes.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::core::value::format_rfc3339;
use crate::core::{ColumnMeta, DbType, Row, SqlValue};

/// Accepted layouts for MySQL `DATE`/`DATETIME` text, tried in order.
const MYSQL_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
const MYSQL_DATE_FORMAT: &str = "%Y-%m-%d";

/// One column that could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionWarning {
    pub column: String,
    pub native_type: String,
    pub reason: String,
}

/// Outcome of coercing one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionReport {
    pub warnings: Vec<CoercionWarning>,
}

impl CoercionReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Columns that were left unconverted or converted lossily.
    pub fn failed_columns(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().map(|w| w.column.as_str())
    }
}

/// Native type groups the coercion rules care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NativeKind {
    Text,
    TinyInt,
    Integer,
    Float,
    Date,
    Other,
}

impl NativeKind {
    fn of(native_type: &str) -> Self {
        match native_type.to_ascii_uppercase().as_str() {
            "VARCHAR" | "TEXT" | "JSON" | "JSONB" => NativeKind::Text,
            "TINYINT" => NativeKind::TinyInt,
            "BIGINT" | "INT" | "SMALLINT" => NativeKind::Integer,
            "DECIMAL" | "NUMERIC" | "FLOAT" => NativeKind::Float,
            "DATE" | "DATETIME" => NativeKind::Date,
            _ => NativeKind::Other,
        }
    }
}

/// Coerce every described column of `row` in place.
///
/// Columns missing from `row` are ignored. Never fails; see
/// [`CoercionReport`] for what could not be converted.
pub fn coerce_row(db_type: DbType, columns: &[ColumnMeta], row: &mut Row) -> CoercionReport {
    let mut report = CoercionReport::default();

    for col in columns {
        let Some(value) = row.get_mut(&col.name) else {
            continue;
        };
        if let Err(reason) = coerce_value(db_type, &col.native_type, value) {
            warn!("Column {} ({}): {}", col.name, col.native_type, reason);
            report.warnings.push(CoercionWarning {
                column: col.name.clone(),
                native_type: col.native_type.clone(),
                reason,
            });
        }
    }

    report
}

/// Coerce a single value in place.
///
/// On `Err` the value is left unchanged, except for invalid UTF-8 text which
/// is replaced lossily.
pub fn coerce_value(
    db_type: DbType,
    native_type: &str,
    value: &mut SqlValue,
) -> Result<(), String> {
    let kind = NativeKind::of(native_type);

    let coerced = match value {
        SqlValue::Bytes(bytes) => match coerce_bytes(db_type, kind, bytes) {
            Ok(Some(v)) => v,
            Ok(None) => return Ok(()),
            Err(BytesError::Lossy(text, reason)) => {
                *value = SqlValue::Text(text);
                return Err(reason);
            }
            Err(BytesError::Unparsed(reason)) => return Err(reason),
        },
        SqlValue::I64(v) => match kind {
            // MySQL upserts hand tinyint booleans back already decoded.
            NativeKind::TinyInt => SqlValue::Bool(*v == 1),
            _ => return Ok(()),
        },
        SqlValue::DateTime(_) | SqlValue::NaiveDateTime(_) | SqlValue::DocumentDateTime(_) => {
            match value.to_rfc3339() {
                Some(ts) => SqlValue::Text(ts),
                None => return Err(format!("{} value out of range", value.kind())),
            }
        }
        SqlValue::Null
        | SqlValue::Bool(_)
        | SqlValue::F64(_)
        | SqlValue::Text(_)
        | SqlValue::Uuid(_)
        | SqlValue::Decimal(_) => return Ok(()),
    };

    *value = coerced;
    Ok(())
}

enum BytesError {
    /// Decoded with replacement characters.
    Lossy(String, String),
    /// Left as bytes.
    Unparsed(String),
}

fn coerce_bytes(
    db_type: DbType,
    kind: NativeKind,
    bytes: &[u8],
) -> Result<Option<SqlValue>, BytesError> {
    match kind {
        NativeKind::Text => decode_utf8(bytes).map(|s| Some(SqlValue::Text(s))),
        NativeKind::TinyInt => {
            let text = as_str(bytes)?;
            parse_bool(text)
                .map(|b| Some(SqlValue::Bool(b)))
                .ok_or_else(|| BytesError::Unparsed(format!("invalid boolean {:?}", text)))
        }
        NativeKind::Integer => {
            let text = as_str(bytes)?;
            text.parse::<i64>()
                .map(|v| Some(SqlValue::I64(v)))
                .map_err(|e| BytesError::Unparsed(format!("invalid integer {:?}: {}", text, e)))
        }
        NativeKind::Float => {
            let text = as_str(bytes)?;
            text.parse::<f64>()
                .map(|v| Some(SqlValue::F64(v)))
                .map_err(|e| BytesError::Unparsed(format!("invalid float {:?}: {}", text, e)))
        }
        NativeKind::Date if db_type == DbType::Mysql => {
            let text = as_str(bytes)?;
            parse_mysql_datetime(text)
                .map(|ts| Some(SqlValue::Text(format_rfc3339(&ts.and_utc()))))
                .ok_or_else(|| BytesError::Unparsed(format!("invalid datetime {:?}", text)))
        }
        NativeKind::Date => decode_utf8(bytes).map(|s| Some(SqlValue::Text(s))),
        NativeKind::Other => Ok(None),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, BytesError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(e) => Err(BytesError::Lossy(
            String::from_utf8_lossy(bytes).into_owned(),
            format!("invalid UTF-8: {}", e),
        )),
    }
}

fn as_str(bytes: &[u8]) -> Result<&str, BytesError> {
    std::str::from_utf8(bytes).map_err(|e| BytesError::Unparsed(format!("invalid UTF-8: {}", e)))
}

/// Boolean strings accepted for tinyint columns.
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_mysql_datetime(text: &str) -> Option<NaiveDateTime> {
    MYSQL_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, MYSQL_DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
