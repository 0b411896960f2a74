//! Dialect expression tree and its SQL rendering.

use serde_json::Value;

use crate::core::traits::Dialect;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// Boolean expression produced by the filter compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// No restriction.
    True,
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    In {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// Regex predicate rendered as an equality; `keyed` predicates are
    /// patched to the dialect regex operator after rendering.
    Pattern {
        column: String,
        value: Value,
        keyed: bool,
    },
    /// Literal SQL fragment with `?` at each bind point.
    Raw { sql: String, args: Vec<Value> },
}

impl Expression {
    pub fn is_true(&self) -> bool {
        matches!(self, Expression::True)
    }

    /// Top-level predicates joined by AND.
    pub fn conjuncts(&self) -> &[Expression] {
        match self {
            Expression::And(parts) => parts.as_slice(),
            Expression::True => &[],
            other => std::slice::from_ref(other),
        }
    }

    /// Render into `writer`.
    pub fn render(&self, writer: &mut SqlWriter<'_>) {
        match self {
            Expression::True => writer.push_str("1 = 1"),
            Expression::And(parts) => render_joined(writer, parts, " AND ", "1 = 1"),
            Expression::Or(parts) => render_joined(writer, parts, " OR ", "1 = 0"),
            Expression::Compare { column, op, value } => match (op, value) {
                (CompareOp::Eq, Value::Null) => {
                    writer.push_str(column);
                    writer.push_str(" IS NULL");
                }
                (CompareOp::Ne, Value::Null) => {
                    writer.push_str(column);
                    writer.push_str(" IS NOT NULL");
                }
                (CompareOp::Eq | CompareOp::Ne, Value::Bool(b)) => {
                    let test = writer.dialect.boolean_test(column, *op == CompareOp::Ne, *b);
                    writer.push_str(&test);
                }
                _ => {
                    writer.push_str(column);
                    writer.push_str(" ");
                    writer.push_str(op.as_sql());
                    writer.push_str(" ");
                    writer.bind(value.clone());
                }
            },
            Expression::In {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    writer.push_str(if *negated { "1 = 1" } else { "1 = 0" });
                    return;
                }
                writer.push_str(column);
                writer.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        writer.push_str(", ");
                    }
                    writer.bind(value.clone());
                }
                writer.push_str(")");
            }
            Expression::Pattern {
                column,
                value,
                keyed,
            } => {
                if *keyed {
                    writer.mark_pattern();
                }
                writer.push_str(column);
                writer.push_str(" = ");
                writer.bind(value.clone());
            }
            Expression::Raw { sql, args } => {
                let mut args = args.iter();
                for (i, piece) in sql.split('?').enumerate() {
                    if i > 0 {
                        writer.bind(args.next().cloned().unwrap_or(Value::Null));
                    }
                    writer.push_str(piece);
                }
            }
        }
    }

    /// Render on its own.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Rendered {
        let mut writer = SqlWriter::new(dialect);
        self.render(&mut writer);
        writer.finish()
    }
}

fn render_joined(writer: &mut SqlWriter<'_>, parts: &[Expression], sep: &str, empty: &str) {
    match parts {
        [] => writer.push_str(empty),
        [only] => only.render(writer),
        _ => {
            writer.push_str("(");
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    writer.push_str(sep);
                }
                part.render(writer);
            }
            writer.push_str(")");
        }
    }
}

/// Accumulates SQL text, bound arguments and regex pattern offsets.
///
/// Placeholders are numbered across everything written to one writer, so a
/// statement's SET list and WHERE clause share one sequence.
pub struct SqlWriter<'d> {
    dialect: &'d dyn Dialect,
    sql: String,
    args: Vec<Value>,
    pattern_offsets: Vec<usize>,
}

impl<'d> SqlWriter<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            args: Vec::new(),
            pattern_offsets: Vec::new(),
        }
    }

    pub fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Append the next positional marker and remember its argument.
    pub fn bind(&mut self, value: Value) {
        self.args.push(value);
        let marker = self.dialect.param_placeholder(self.args.len());
        self.sql.push_str(&marker);
    }

    fn mark_pattern(&mut self) {
        self.pattern_offsets.push(self.sql.len());
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            sql: self.sql,
            args: self.args,
            pattern_offsets: self.pattern_offsets,
        }
    }
}

/// Output of rendering: text with generic markers, arguments in marker
/// order, and the byte offset of every keyed regex predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub args: Vec<Value>,
    pub pattern_offsets: Vec<usize>,
}
