//! MySQL/MariaDB driver.
//!
//! - [`MysqlDialect`]: SQL syntax strategy
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+ (`JSON_CONTAINS` and `REGEXP`)
//! - MariaDB 10.2+

mod dialect;

pub use dialect::MysqlDialect;
