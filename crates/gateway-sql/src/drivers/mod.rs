//! Database dialect implementations.
//!
//! - [`mysql`]: MySQL/MariaDB
//! - [`postgres`]: PostgreSQL
//! - [`mssql`]: Microsoft SQL Server
//!
//! # Adding New Databases
//!
//! 1. Create a new module under `drivers/` with a `Dialect` implementation
//! 2. Add a variant to [`DbType`] and to [`DialectImpl`]
//! 3. Map the new `DbType` in [`DialectImpl::from_db_type`]

pub mod mssql;
pub mod mysql;
pub mod postgres;

pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;

use crate::core::traits::Dialect;
use crate::core::DbType;
use crate::error::{GatewayError, Result};

/// Enum-based static dispatch for dialects.
///
/// The compiler generates a match statement instead of using vtable
/// dispatch.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Mysql(MysqlDialect),
    Postgres(PostgresDialect),
    Mssql(MssqlDialect),
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Mysql(d) => d.name(),
            DialectImpl::Postgres(d) => d.name(),
            DialectImpl::Mssql(d) => d.name(),
        }
    }

    fn db_type(&self) -> DbType {
        match self {
            DialectImpl::Mysql(d) => d.db_type(),
            DialectImpl::Postgres(d) => d.db_type(),
            DialectImpl::Mssql(d) => d.db_type(),
        }
    }

    fn qualify(&self, collection: &str, field: &str) -> String {
        match self {
            DialectImpl::Mysql(d) => d.qualify(collection, field),
            DialectImpl::Postgres(d) => d.qualify(collection, field),
            DialectImpl::Mssql(d) => d.qualify(collection, field),
        }
    }

    fn param_placeholder(&self, index: usize) -> String {
        match self {
            DialectImpl::Mysql(d) => d.param_placeholder(index),
            DialectImpl::Postgres(d) => d.param_placeholder(index),
            DialectImpl::Mssql(d) => d.param_placeholder(index),
        }
    }

    fn rewrite_placeholders(&self, sql: &str) -> String {
        match self {
            DialectImpl::Mysql(d) => d.rewrite_placeholders(sql),
            DialectImpl::Postgres(d) => d.rewrite_placeholders(sql),
            DialectImpl::Mssql(d) => d.rewrite_placeholders(sql),
        }
    }

    fn boolean_test(&self, column: &str, negated: bool, value: bool) -> String {
        match self {
            DialectImpl::Mysql(d) => d.boolean_test(column, negated, value),
            DialectImpl::Postgres(d) => d.boolean_test(column, negated, value),
            DialectImpl::Mssql(d) => d.boolean_test(column, negated, value),
        }
    }

    fn regex_placeholder(&self, field: &str) -> Option<String> {
        match self {
            DialectImpl::Mysql(d) => d.regex_placeholder(field),
            DialectImpl::Postgres(d) => d.regex_placeholder(field),
            DialectImpl::Mssql(d) => d.regex_placeholder(field),
        }
    }

    fn regex_operator(&self) -> Option<&'static str> {
        match self {
            DialectImpl::Mysql(d) => d.regex_operator(),
            DialectImpl::Postgres(d) => d.regex_operator(),
            DialectImpl::Mssql(d) => d.regex_operator(),
        }
    }

    fn contains_template(&self, field: &str) -> Option<String> {
        match self {
            DialectImpl::Mysql(d) => d.contains_template(field),
            DialectImpl::Postgres(d) => d.contains_template(field),
            DialectImpl::Mssql(d) => d.contains_template(field),
        }
    }
}

impl DialectImpl {
    /// Create a dialect implementation for a backend.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedDialect` for backends without SQL (`Mongo`).
    pub fn from_db_type(db_type: DbType) -> Result<Self> {
        match db_type {
            DbType::Mysql => Ok(DialectImpl::Mysql(MysqlDialect::new())),
            DbType::Postgres => Ok(DialectImpl::Postgres(PostgresDialect::new())),
            DbType::SqlServer => Ok(DialectImpl::Mssql(MssqlDialect::new())),
            DbType::Mongo => Err(GatewayError::UnsupportedDialect(format!(
                "'{}' has no SQL dialect",
                db_type
            ))),
        }
    }

    /// Create a dialect implementation from a database type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database type is not recognized or has no SQL dialect.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_db_type(name.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_impl_from_name() {
        let mysql = DialectImpl::from_name("mysql").unwrap();
        assert_eq!(mysql.name(), "mysql");

        let postgres = DialectImpl::from_name("postgres").unwrap();
        assert_eq!(postgres.name(), "postgres");

        let mssql = DialectImpl::from_name("mssql").unwrap();
        assert_eq!(mssql.db_type(), DbType::SqlServer);

        assert!(DialectImpl::from_name("postgresql").is_ok());
        assert!(DialectImpl::from_name("pg").is_ok());
        assert!(DialectImpl::from_name("unknown").is_err());
    }

    #[test]
    fn test_mongo_has_no_dialect() {
        assert!(matches!(
            DialectImpl::from_db_type(DbType::Mongo),
            Err(GatewayError::UnsupportedDialect(_))
        ));
    }

    #[test]
    fn test_dialect_impl_dispatch() {
        let dialect = DialectImpl::Postgres(PostgresDialect::new());
        assert_eq!(dialect.qualify("public", "users"), "public.users");
        assert_eq!(dialect.param_placeholder(1), "$1");

        let dialect = DialectImpl::Mssql(MssqlDialect::new());
        assert_eq!(dialect.rewrite_placeholders("a = $1"), "a = @p1");

        let dialect = DialectImpl::Mysql(MysqlDialect::new());
        assert_eq!(dialect.qualify("app", "users"), "users");
        assert_eq!(dialect.param_placeholder(3), "?");
    }
}
