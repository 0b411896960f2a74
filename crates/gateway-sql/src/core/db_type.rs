//! Backend identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// The fixed set of backends the gateway talks to.
///
/// `Mongo` has no SQL dialect; it only changes how result timestamps are
/// coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DbType {
    Mysql,
    Postgres,
    SqlServer,
    Mongo,
}

impl DbType {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DbType::Mysql => "mysql",
            DbType::Postgres => "postgres",
            DbType::SqlServer => "sqlserver",
            DbType::Mongo => "mongo",
        }
    }

    /// Whether this backend speaks SQL.
    pub fn is_sql(&self) -> bool {
        !matches!(self, DbType::Mongo)
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbType {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DbType::Mysql),
            "postgres" | "postgresql" | "pg" => Ok(DbType::Postgres),
            "sqlserver" | "sql_server" | "mssql" => Ok(DbType::SqlServer),
            "mongo" | "mongodb" => Ok(DbType::Mongo),
            other => Err(GatewayError::UnsupportedDialect(format!(
                "unknown database type '{}'. Supported types: mysql, postgres, sqlserver, mongo",
                other
            ))),
        }
    }
}

impl TryFrom<String> for DbType {
    type Error = GatewayError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DbType> for String {
    fn from(value: DbType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("MySQL".parse::<DbType>().unwrap(), DbType::Mysql);
        assert_eq!("pg".parse::<DbType>().unwrap(), DbType::Postgres);
        assert_eq!("postgresql".parse::<DbType>().unwrap(), DbType::Postgres);
        assert_eq!("mssql".parse::<DbType>().unwrap(), DbType::SqlServer);
        assert_eq!("sql_server".parse::<DbType>().unwrap(), DbType::SqlServer);
        assert_eq!("mongodb".parse::<DbType>().unwrap(), DbType::Mongo);
        assert!("oracle".parse::<DbType>().is_err());
    }

    #[test]
    fn test_is_sql() {
        assert!(DbType::SqlServer.is_sql());
        assert!(!DbType::Mongo.is_sql());
    }

    #[test]
    fn test_serde_uses_names() {
        let db: DbType = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(db, DbType::Postgres);
        assert_eq!(serde_json::to_string(&DbType::SqlServer).unwrap(), "\"sqlserver\"");
    }
}
