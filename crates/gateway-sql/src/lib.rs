//! # gateway-sql
//!
//! SQL translation layer for a backend-as-a-service data gateway.
//!
//! Clients describe queries with a database-agnostic filter object
//! (`{"age": {"$gte": 18}, "$or": [...]}`) and send insert/update payloads
//! as plain JSON objects. This crate turns those into dialect-specific SQL
//! for MySQL, PostgreSQL and SQL Server, and normalizes the values drivers
//! hand back:
//!
//! - **Filter compilation** with `$eq`/`$ne`/ordering/`$in`/`$nin`/`$regex`/
//!   `$contains` operators and nested `$or`
//! - **Dialect adapters** for column qualification and bind parameter syntax
//! - **Statement building** for select, insert, update and delete
//! - **Result coercion** from driver representations to canonical values
//!
//! ## Example
//!
//! ```rust,no_run
//! use gateway_sql::{Config, SqlCrud};
//! use serde_json::json;
//!
//! fn main() -> gateway_sql::Result<()> {
//!     let config = Config::load("gateway.yaml")?;
//!     let crud = SqlCrud::new(config)?;
//!     let stmt = crud.select("users", &json!({"name": {"$regex": "^j"}}))?;
//!     println!("{} {:?}", stmt.sql, stmt.args);
//!     Ok(())
//! }
//! ```

pub mod coerce;
pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod record;
pub mod statement;

// Re-exports for convenient access
pub use coerce::{coerce_row, CoercionReport, CoercionWarning};
pub use config::Config;
pub use core::{ColumnMeta, DbType, Dialect, Row, SqlValue};
pub use drivers::DialectImpl;
pub use error::{GatewayError, Result};
pub use filter::{compile, compile_value, Compiled, Filter, SkippedPredicate};
pub use gateway::SqlCrud;
pub use record::{build_record, build_records, Record};
pub use statement::{apply_pattern_keys, Statement};
