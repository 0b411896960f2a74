//! Core abstractions shared by every dialect.
//!
//! - [`schema`]: collections, fields and field directives
//! - [`value`]: driver value representation and result rows
//! - [`traits`]: the [`Dialect`] strategy trait
//! - [`db_type`]: backend identifiers
//! - [`identifier`]: identifier validation

pub mod db_type;
pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

pub use db_type::DbType;
pub use schema::{
    Collection, Directive, FieldKind, FieldType, Fields, ForeignKeysType, IndexType,
    InspectorFieldType, TableProperties, Type,
};
pub use traits::Dialect;
pub use value::{ColumnMeta, Row, SqlValue};
