//! Result coercion integration tests.

mod common;

use gateway_sql::{coerce_row, ColumnMeta, DbType, Row, SqlValue};

fn bytes(s: &str) -> SqlValue {
    SqlValue::Bytes(s.as_bytes().to_vec())
}

fn mysql_row(values: &[(&str, SqlValue)]) -> Row {
    values
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_tinyint_bytes_to_bool() {
    common::init_tracing();
    let columns = [ColumnMeta::new("active", "TINYINT")];

    let mut row = mysql_row(&[("active", bytes("1"))]);
    coerce_row(DbType::Mysql, &columns, &mut row);
    assert_eq!(row["active"], SqlValue::Bool(true));

    let mut row = mysql_row(&[("active", bytes("0"))]);
    coerce_row(DbType::Mysql, &columns, &mut row);
    assert_eq!(row["active"], SqlValue::Bool(false));
}

#[test]
fn test_mysql_datetime_to_rfc3339() {
    let columns = [ColumnMeta::new("created", "DATETIME")];
    let mut row = mysql_row(&[("created", bytes("2023-05-01 10:00:00"))]);
    let report = coerce_row(DbType::Mysql, &columns, &mut row);
    assert!(report.is_clean());
    assert_eq!(row["created"], SqlValue::Text("2023-05-01T10:00:00Z".to_string()));
}

#[test]
fn test_failed_column_leaves_siblings_coerced() {
    common::init_tracing();
    let columns = [
        ColumnMeta::new("id", "BIGINT"),
        ColumnMeta::new("score", "FLOAT"),
        ColumnMeta::new("name", "varchar"),
    ];
    let mut row = mysql_row(&[
        ("id", bytes("7")),
        ("score", bytes("not-a-number")),
        ("name", bytes("ada")),
    ]);

    let report = coerce_row(DbType::Mysql, &columns, &mut row);

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].column, "score");
    assert_eq!(report.warnings[0].native_type, "FLOAT");
    assert_eq!(row["id"], SqlValue::I64(7));
    assert_eq!(row["score"], bytes("not-a-number"));
    assert_eq!(row["name"], SqlValue::Text("ada".to_string()));
}

#[test]
fn test_second_pass_is_noop() {
    let columns = [
        ColumnMeta::new("active", "TINYINT"),
        ColumnMeta::new("created", "DATE"),
        ColumnMeta::new("n", "INT"),
    ];
    let mut row = mysql_row(&[
        ("active", bytes("true")),
        ("created", bytes("2023-05-01 10:00:00")),
        ("n", bytes("12")),
    ]);

    coerce_row(DbType::Mysql, &columns, &mut row);
    let once = row.clone();
    let report = coerce_row(DbType::Mysql, &columns, &mut row);

    assert!(report.is_clean());
    assert_eq!(row, once);
}

#[test]
fn test_rfc3339_bytes_not_reparsed() {
    let columns = [ColumnMeta::new("created", "DATE")];
    let mut row = mysql_row(&[("created", bytes("2023-05-01T10:00:00Z"))]);
    let report = coerce_row(DbType::Mysql, &columns, &mut row);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(row["created"], bytes("2023-05-01T10:00:00Z"));
}

#[test]
fn test_driver_timestamps() {
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let aware = offset.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap();
    let naive = NaiveDate::from_ymd_opt(2023, 5, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();

    let columns = [
        ColumnMeta::new("a", "timestamptz"),
        ColumnMeta::new("b", "timestamp"),
    ];
    let mut row = mysql_row(&[
        ("a", SqlValue::DateTime(aware)),
        ("b", SqlValue::NaiveDateTime(naive)),
    ]);
    coerce_row(DbType::Postgres, &columns, &mut row);

    let expected = SqlValue::Text("2023-05-01T10:00:00Z".to_string());
    assert_eq!(row["a"], expected);
    assert_eq!(row["b"], expected);
}
