//! CRUD statement builder.
//!
//! Statements are rendered through one [`SqlWriter`] so placeholder numbering
//! runs across the whole statement, then regex predicates are patched and
//! the generic markers are rewritten for the target backend. The returned
//! [`Statement`] is ready to hand to a driver.

use serde_json::Value;
use tracing::debug;

use crate::core::identifier::{validate_identifier, validate_payload_field};
use crate::core::traits::Dialect;
use crate::error::{GatewayError, Result};
use crate::filter::{compile, Compiled, Filter, Rendered, SqlWriter};
use crate::record::Record;

/// SQL text plus its bound arguments, in marker order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

/// `SELECT * FROM <table> [WHERE ...]`.
///
/// # Errors
///
/// Returns `Config` for an invalid namespace or table name and
/// `PatternMismatch` if regex patching fails.
pub fn select(
    dialect: &dyn Dialect,
    namespace: &str,
    table: &str,
    filter: &Filter,
) -> Result<Statement> {
    let target = table_name(dialect, namespace, table)?;
    let compiled = compile_for(dialect, table, filter);

    let mut writer = SqlWriter::new(dialect);
    writer.push_str("SELECT * FROM ");
    writer.push_str(&target);
    write_where(&mut writer, &compiled);

    finish(dialect, "select", writer.finish(), &compiled.pattern_keys)
}

/// Multi-row `INSERT`.
///
/// The column list is the sorted union of every record's columns; a record
/// missing a column binds `NULL` for it.
///
/// # Errors
///
/// Returns `InvalidPayload` when there are no records, no columns, or a
/// column name is not a valid identifier.
pub fn insert(
    dialect: &dyn Dialect,
    namespace: &str,
    table: &str,
    records: &[Record],
) -> Result<Statement> {
    let target = table_name(dialect, namespace, table)?;
    if records.is_empty() {
        return Err(GatewayError::InvalidPayload("no records to insert".to_string()));
    }

    let mut columns: Vec<&str> = records.iter().flat_map(|r| r.columns()).collect();
    columns.sort_unstable();
    columns.dedup();
    if columns.is_empty() {
        return Err(GatewayError::InvalidPayload("insert records have no columns".to_string()));
    }
    for column in &columns {
        validate_payload_field(column)?;
    }

    let mut writer = SqlWriter::new(dialect);
    writer.push_str("INSERT INTO ");
    writer.push_str(&target);
    writer.push_str(" (");
    writer.push_str(&columns.join(", "));
    writer.push_str(") VALUES ");
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            writer.push_str(", ");
        }
        writer.push_str("(");
        for (j, column) in columns.iter().enumerate() {
            if j > 0 {
                writer.push_str(", ");
            }
            writer.bind(record.get(column).cloned().unwrap_or(Value::Null));
        }
        writer.push_str(")");
    }

    finish(dialect, "insert", writer.finish(), &[])
}

/// `UPDATE <table> SET ... [WHERE ...]`.
///
/// SET values are numbered ahead of the WHERE arguments.
///
/// # Errors
///
/// Returns `InvalidPayload` for an empty `set` record or an invalid column
/// name.
pub fn update(
    dialect: &dyn Dialect,
    namespace: &str,
    table: &str,
    filter: &Filter,
    set: &Record,
) -> Result<Statement> {
    let target = table_name(dialect, namespace, table)?;
    if set.is_empty() {
        return Err(GatewayError::InvalidPayload("nothing to update".to_string()));
    }
    for column in set.columns() {
        validate_payload_field(column)?;
    }
    let compiled = compile_for(dialect, table, filter);

    let mut writer = SqlWriter::new(dialect);
    writer.push_str("UPDATE ");
    writer.push_str(&target);
    writer.push_str(" SET ");
    for (i, (column, value)) in set.iter().enumerate() {
        if i > 0 {
            writer.push_str(", ");
        }
        writer.push_str(column);
        writer.push_str(" = ");
        writer.bind(value.clone());
    }
    write_where(&mut writer, &compiled);

    finish(dialect, "update", writer.finish(), &compiled.pattern_keys)
}

/// `DELETE FROM <table> [WHERE ...]`.
///
/// # Errors
///
/// Returns `Config` for an invalid namespace or table name.
pub fn delete(
    dialect: &dyn Dialect,
    namespace: &str,
    table: &str,
    filter: &Filter,
) -> Result<Statement> {
    let target = table_name(dialect, namespace, table)?;
    let compiled = compile_for(dialect, table, filter);

    let mut writer = SqlWriter::new(dialect);
    writer.push_str("DELETE FROM ");
    writer.push_str(&target);
    write_where(&mut writer, &compiled);

    finish(dialect, "delete", writer.finish(), &compiled.pattern_keys)
}

/// Patch every keyed regex predicate in `rendered` to use the dialect's
/// regex operator.
///
/// `pattern_keys[i]` must be found at `rendered.pattern_offsets[i]`.
///
/// # Errors
///
/// Returns `PatternMismatch` when the counts differ or a key does not match
/// the text at its offset, and `UnsupportedDialect` when keys are present
/// but the dialect has no regex operator.
pub fn apply_pattern_keys(
    rendered: &Rendered,
    pattern_keys: &[String],
    dialect: &dyn Dialect,
) -> Result<String> {
    let offsets = &rendered.pattern_offsets;
    if offsets.len() != pattern_keys.len() {
        let index = offsets.len().min(pattern_keys.len());
        return Err(GatewayError::PatternMismatch {
            index,
            key: pattern_keys.get(index).cloned().unwrap_or_default(),
        });
    }
    if pattern_keys.is_empty() {
        return Ok(rendered.sql.clone());
    }

    let operator = dialect.regex_operator().ok_or_else(|| {
        GatewayError::UnsupportedDialect(format!("{} has no regex operator", dialect.name()))
    })?;

    let mut sql = rendered.sql.clone();
    for (index, (key, &offset)) in pattern_keys.iter().zip(offsets).enumerate().rev() {
        let mismatch = || GatewayError::PatternMismatch {
            index,
            key: key.clone(),
        };
        let matches = sql.get(offset..).is_some_and(|rest| rest.starts_with(key.as_str()));
        if !matches {
            return Err(mismatch());
        }
        let eq = key.find(" = ").ok_or_else(mismatch)? + offset + 1;
        sql.replace_range(eq..eq + 1, operator);
    }

    Ok(sql)
}

fn table_name(dialect: &dyn Dialect, namespace: &str, table: &str) -> Result<String> {
    validate_identifier(namespace)?;
    validate_identifier(table)?;
    Ok(dialect.qualify(namespace, table))
}

fn compile_for(dialect: &dyn Dialect, table: &str, filter: &Filter) -> Compiled {
    compile(dialect, &filter.clone().qualified(dialect, table))
}

fn write_where(writer: &mut SqlWriter<'_>, compiled: &Compiled) {
    if compiled.expr.is_true() {
        return;
    }
    writer.push_str(" WHERE ");
    compiled.expr.render(writer);
}

fn finish(
    dialect: &dyn Dialect,
    kind: &str,
    rendered: Rendered,
    pattern_keys: &[String],
) -> Result<Statement> {
    let sql = apply_pattern_keys(&rendered, pattern_keys, dialect)?;
    let sql = dialect.rewrite_placeholders(&sql);
    debug!(
        "{} {} statement with {} args: {}",
        dialect.name(),
        kind,
        rendered.args.len(),
        sql
    );
    Ok(Statement {
        sql,
        args: rendered.args,
    })
}
