//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::core::DbType;

/// Root configuration structure.
///
/// ```yaml
/// db_type: postgres
/// namespace: app
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend the gateway talks to (`mysql`, `postgres`, `sqlserver`, `mongo`).
    #[serde(alias = "dbType")]
    pub db_type: DbType,

    /// Schema/database that holds the project's tables. Tables are qualified
    /// with it on backends that support schema-qualified names.
    #[serde(alias = "project")]
    pub namespace: String,
}

impl Config {
    pub fn new(db_type: DbType, namespace: impl Into<String>) -> Self {
        Self {
            db_type,
            namespace: namespace.into(),
        }
    }
}
