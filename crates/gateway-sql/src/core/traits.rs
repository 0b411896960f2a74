//! The dialect strategy trait.
//!
//! Each SQL backend differs in how columns are qualified, how bind
//! parameters are written, and which regex/JSON containment operators exist.
//! [`Dialect`] captures those differences so the filter compiler and the
//! statement builder stay backend-agnostic.

use super::db_type::DbType;

/// SQL syntax strategy for different database engines.
///
/// Statements are first rendered with the dialect's generic positional
/// marker (`$N` or `?`) and then passed through
/// [`rewrite_placeholders`](Dialect::rewrite_placeholders) once, immediately
/// before execution.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "mysql", "postgres").
    fn name(&self) -> &str;

    /// Backend this dialect belongs to.
    fn db_type(&self) -> DbType;

    /// Qualify a field with its collection where the backend needs it.
    ///
    /// - PostgreSQL, SQL Server: `collection.field`
    /// - MySQL: `field`
    fn qualify(&self, collection: &str, field: &str) -> String;

    /// Generic positional marker for the given 1-based index.
    ///
    /// - PostgreSQL, SQL Server: `$1`, `$2`, etc.
    /// - MySQL: `?`
    fn param_placeholder(&self, index: usize) -> String;

    /// Rewrite generic markers into the backend's final parameter syntax.
    fn rewrite_placeholders(&self, sql: &str) -> String {
        sql.to_string()
    }

    /// Equality test of `column` against a boolean literal.
    ///
    /// Rendered as `IS [NOT] TRUE|FALSE`, so `IS NOT FALSE` also matches
    /// NULL rows.
    fn boolean_test(&self, column: &str, negated: bool, value: bool) -> String {
        format!(
            "{} IS {}{}",
            column,
            if negated { "NOT " } else { "" },
            if value { "TRUE" } else { "FALSE" }
        )
    }

    /// Pattern key recorded for a `$regex` predicate on `field`.
    ///
    /// The key is the prefix of the rendered equality predicate, e.g.
    /// `name = $`. `None` means the backend has no regex operator and the
    /// predicate stays a plain equality.
    fn regex_placeholder(&self, _field: &str) -> Option<String> {
        None
    }

    /// Operator that replaces `=` in a patched regex predicate.
    fn regex_operator(&self) -> Option<&'static str> {
        None
    }

    /// JSON containment fragment for `field`, with `?` at the bind point.
    fn contains_template(&self, _field: &str) -> Option<String> {
        None
    }
}
