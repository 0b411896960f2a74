//! CRUD facade bound to one backend and namespace.

use serde_json::Value;
use tracing::info;

use crate::coerce::{coerce_row, CoercionReport};
use crate::config::Config;
use crate::core::traits::Dialect;
use crate::core::{ColumnMeta, DbType, Row};
use crate::drivers::DialectImpl;
use crate::error::Result;
use crate::filter::{compile_value, Compiled, Filter};
use crate::record::{build_record, build_records, Record};
use crate::statement::{self, Statement};

/// SQL CRUD helper for one configured backend.
///
/// Accepts the untyped request shapes (filter objects, insert/update
/// payloads) and produces ready-to-execute statements. Also coerces result
/// rows coming back from the driver.
#[derive(Debug, Clone)]
pub struct SqlCrud {
    db_type: DbType,
    dialect: DialectImpl,
    namespace: String,
}

impl SqlCrud {
    /// Create a facade from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the configuration is invalid and
    /// `UnsupportedDialect` if the backend has no SQL dialect.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let dialect = config.dialect()?;
        info!(
            "SQL CRUD ready: {} (namespace {})",
            dialect.name(),
            config.namespace
        );
        Ok(Self {
            db_type: config.db_type,
            dialect,
            namespace: config.namespace,
        })
    }

    pub fn db_type(&self) -> DbType {
        self.db_type
    }

    pub fn dialect(&self) -> &DialectImpl {
        &self.dialect
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Compile a canonical filter object.
    pub fn compile(&self, filter: &Value) -> Result<Compiled> {
        compile_value(&self.dialect, filter)
    }

    pub fn qualify(&self, collection: &str, field: &str) -> String {
        self.dialect.qualify(collection, field)
    }

    pub fn rewrite_placeholders(&self, sql: &str) -> String {
        self.dialect.rewrite_placeholders(sql)
    }

    pub fn build_record(&self, payload: &Value) -> Result<Record> {
        build_record(payload)
    }

    /// Coerce one driver row in place.
    pub fn coerce(&self, columns: &[ColumnMeta], row: &mut Row) -> CoercionReport {
        coerce_row(self.db_type, columns, row)
    }

    pub fn select(&self, table: &str, filter: &Value) -> Result<Statement> {
        let filter = Filter::parse(filter)?;
        statement::select(&self.dialect, &self.namespace, table, &filter)
    }

    /// Insert one object or an array of objects.
    pub fn insert(&self, table: &str, payload: &Value) -> Result<Statement> {
        let records = build_records(payload)?;
        statement::insert(&self.dialect, &self.namespace, table, &records)
    }

    pub fn update(&self, table: &str, filter: &Value, set: &Value) -> Result<Statement> {
        let filter = Filter::parse(filter)?;
        let set = build_record(set)?;
        statement::update(&self.dialect, &self.namespace, table, &filter, &set)
    }

    pub fn delete(&self, table: &str, filter: &Value) -> Result<Statement> {
        let filter = Filter::parse(filter)?;
        statement::delete(&self.dialect, &self.namespace, table, &filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SqlValue;
    use crate::error::GatewayError;
    use serde_json::json;

    fn crud(db_type: DbType) -> SqlCrud {
        SqlCrud::new(Config::new(db_type, "app")).unwrap()
    }

    #[test]
    fn test_new_rejects_mongo() {
        let err = SqlCrud::new(Config::new(DbType::Mongo, "app")).unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedDialect(_)));
    }

    #[test]
    fn test_new_rejects_bad_namespace() {
        assert!(SqlCrud::new(Config::new(DbType::Mysql, "")).is_err());
    }

    #[test]
    fn test_accessors() {
        let crud = crud(DbType::SqlServer);
        assert_eq!(crud.db_type(), DbType::SqlServer);
        assert_eq!(crud.namespace(), "app");
        assert_eq!(crud.dialect().name(), "sqlserver");
        assert_eq!(crud.qualify("users", "id"), "users.id");
        assert_eq!(crud.rewrite_placeholders("a = $1"), "a = @p1");
    }

    #[test]
    fn test_select_and_delete() {
        let crud = crud(DbType::Postgres);
        let stmt = crud.select("users", &json!({"id": 1})).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM app.users WHERE users.id = $1");

        let stmt = crud.delete("users", &json!({})).unwrap();
        assert_eq!(stmt.sql, "DELETE FROM app.users");
    }

    #[test]
    fn test_insert_array_payload() {
        let crud = crud(DbType::Mysql);
        let stmt = crud
            .insert("users", &json!([{"name": "a"}, {"name": "b"}]))
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO users (name) VALUES (?), (?)");
        assert_eq!(stmt.args, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_update_rejects_non_object() {
        let crud = crud(DbType::Mysql);
        let err = crud.update("users", &json!({}), &json!([1])).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidPayload(_)));
    }

    #[test]
    fn test_coerce_uses_configured_backend() {
        let crud = crud(DbType::Mysql);
        let mut row = Row::new();
        row.insert("ok".to_string(), SqlValue::Bytes(b"1".to_vec()));
        let report = crud.coerce(&[ColumnMeta::new("ok", "TINYINT")], &mut row);
        assert!(report.is_clean());
        assert_eq!(row["ok"], SqlValue::Bool(true));
    }

    #[test]
    fn test_compile_and_build_record() {
        let crud = crud(DbType::Postgres);
        let compiled = crud.compile(&json!({"a": {"$regex": "x"}})).unwrap();
        assert_eq!(compiled.pattern_keys, vec!["a = $"]);
        assert_eq!(crud.build_record(&json!({"a": 1})).unwrap().len(), 1);
    }
}
