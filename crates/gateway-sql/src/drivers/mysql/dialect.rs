//! MySQL/MariaDB SQL dialect (Strategy pattern).
//!
//! Columns are never qualified, bind parameters are `?`, regex predicates use
//! `REGEXP` and JSON containment uses `JSON_CONTAINS`.

use crate::core::traits::Dialect;
use crate::core::DbType;

/// MySQL/MariaDB dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn db_type(&self) -> DbType {
        DbType::Mysql
    }

    fn qualify(&self, _collection: &str, field: &str) -> String {
        field.to_string()
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn regex_placeholder(&self, field: &str) -> Option<String> {
        Some(format!("{} = ?", field))
    }

    fn regex_operator(&self) -> Option<&'static str> {
        Some("REGEXP")
    }

    fn contains_template(&self, field: &str) -> Option<String> {
        Some(format!("JSON_CONTAINS({}, ?)", field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_is_bare() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.qualify("users", "age"), "age");
    }

    #[test]
    fn test_param_placeholder() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.param_placeholder(1), "?");
        assert_eq!(dialect.param_placeholder(10), "?");
    }

    #[test]
    fn test_rewrite_is_identity() {
        let dialect = MysqlDialect::new();
        let sql = "SELECT * FROM users WHERE age > ? AND note = '$5'";
        assert_eq!(dialect.rewrite_placeholders(sql), sql);
    }

    #[test]
    fn test_regex_and_contains() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.regex_placeholder("name").as_deref(), Some("name = ?"));
        assert_eq!(dialect.regex_operator(), Some("REGEXP"));
        assert_eq!(
            dialect.contains_template("tags").as_deref(),
            Some("JSON_CONTAINS(tags, ?)")
        );
    }
}
