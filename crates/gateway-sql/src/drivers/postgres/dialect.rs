//! PostgreSQL SQL dialect (Strategy pattern).
//!
//! Columns are qualified with their collection, bind parameters are `$N`,
//! regex predicates use `~` and JSON containment uses `@>`.

use crate::core::traits::Dialect;
use crate::core::DbType;

/// PostgreSQL dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn db_type(&self) -> DbType {
        DbType::Postgres
    }

    fn qualify(&self, collection: &str, field: &str) -> String {
        format!("{}.{}", collection, field)
    }

    fn param_placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn regex_placeholder(&self, field: &str) -> Option<String> {
        Some(format!("{} = $", field))
    }

    fn regex_operator(&self) -> Option<&'static str> {
        Some("~")
    }

    fn contains_template(&self, field: &str) -> Option<String> {
        Some(format!("{} @> ?", field))
    }
}
