//! MSSQL SQL dialect (Strategy pattern).
//!
//! Columns are qualified with their collection. Statements are rendered with
//! `$N` markers and rewritten to `@pN` right before execution. SQL Server has
//! neither a regex operator nor JSON containment, and `BIT` columns compare
//! against `1`/`0` instead of `IS TRUE`.

use crate::core::traits::Dialect;
use crate::core::DbType;

/// Microsoft SQL Server dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create a new MSSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MssqlDialect {
    fn name(&self) -> &str {
        "sqlserver"
    }

    fn db_type(&self) -> DbType {
        DbType::SqlServer
    }

    fn qualify(&self, collection: &str, field: &str) -> String {
        format!("{}.{}", collection, field)
    }

    fn param_placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn rewrite_placeholders(&self, sql: &str) -> String {
        sql.replace('$', "@p")
    }

    fn boolean_test(&self, column: &str, negated: bool, value: bool) -> String {
        let bit = u8::from(value);
        if negated {
            format!("({} != {} OR {} IS NULL)", column, bit, column)
        } else {
            format!("{} = {}", column, bit)
        }
    }
}
