//! Microsoft SQL Server driver.
//!
//! - [`MssqlDialect`]: SQL syntax strategy for SQL Server

mod dialect;

pub use dialect::MssqlDialect;
