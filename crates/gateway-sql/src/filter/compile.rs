//! Filter AST → dialect expression compiler.

use serde_json::Value;
use tracing::{error, warn};

use super::ast::{Filter, Operator, Predicate};
use super::expr::{CompareOp, Expression};
use crate::core::traits::Dialect;
use crate::error::Result;

/// A predicate that was dropped or weakened during compilation.
///
/// Dropping degrades to "no constraint" for that field, so callers that need
/// strict filtering should reject a non-empty [`Compiled::skipped`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPredicate {
    pub field: String,
    pub operator: String,
    pub reason: String,
}

/// Result of compiling one filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub expr: Expression,

    /// Regex pattern keys in the order their predicates are rendered.
    pub pattern_keys: Vec<String>,

    pub skipped: Vec<SkippedPredicate>,

    /// Predicates that were kept with a weaker meaning, e.g. `$regex` on a
    /// backend without a regex operator (exact match instead).
    pub degraded: Vec<SkippedPredicate>,
}

/// Compile a parsed filter for `dialect`.
pub fn compile(dialect: &dyn Dialect, filter: &Filter) -> Compiled {
    let mut compiler = Compiler {
        dialect,
        pattern_keys: Vec::new(),
        skipped: Vec::new(),
        degraded: Vec::new(),
    };
    let expr = compiler.filter(filter);
    Compiled {
        expr,
        pattern_keys: compiler.pattern_keys,
        skipped: compiler.skipped,
        degraded: compiler.degraded,
    }
}

/// Parse a canonical filter object and compile it.
///
/// # Errors
///
/// Returns `InvalidFilterShape` from the parse step.
pub fn compile_value(dialect: &dyn Dialect, filter: &Value) -> Result<Compiled> {
    let parsed = Filter::parse(filter)?;
    Ok(compile(dialect, &parsed))
}

/// `$eq`/`$ne` and plain literals; an array operand means set membership.
fn equality(field: &str, operand: &Value, negated: bool) -> Expression {
    match operand {
        Value::Array(items) => Expression::In {
            column: field.to_string(),
            values: items.clone(),
            negated,
        },
        value => Expression::Compare {
            column: field.to_string(),
            op: if negated { CompareOp::Ne } else { CompareOp::Eq },
            value: value.clone(),
        },
    }
}

struct Compiler<'a> {
    dialect: &'a dyn Dialect,
    pattern_keys: Vec<String>,
    skipped: Vec<SkippedPredicate>,
    degraded: Vec<SkippedPredicate>,
}

impl Compiler<'_> {
    fn filter(&mut self, filter: &Filter) -> Expression {
        match filter {
            Filter::And(parts) => {
                let mut exprs: Vec<Expression> = parts
                    .iter()
                    .map(|p| self.filter(p))
                    .filter(|e| !e.is_true())
                    .collect();
                match exprs.len() {
                    0 => Expression::True,
                    1 => exprs.remove(0),
                    _ => Expression::And(exprs),
                }
            }
            // Branches are never collapsed: a dropped branch would leave its
            // pattern keys without a rendered predicate.
            Filter::Or(branches) => {
                Expression::Or(branches.iter().map(|b| self.filter(b)).collect())
            }
            Filter::Field { field, predicate } => match predicate {
                Predicate::Literal(value) => equality(field, value, false),
                Predicate::Compare { op, operand } => self
                    .operator(field, op, operand)
                    .unwrap_or(Expression::True),
            },
        }
    }

    fn operator(&mut self, field: &str, op: &Operator, operand: &Value) -> Option<Expression> {
        let compare = |op: CompareOp| Expression::Compare {
            column: field.to_string(),
            op,
            value: operand.clone(),
        };

        match op {
            Operator::Eq => Some(equality(field, operand, false)),
            Operator::Ne => Some(equality(field, operand, true)),
            Operator::Gt => Some(compare(CompareOp::Gt)),
            Operator::Gte => Some(compare(CompareOp::Gte)),
            Operator::Lt => Some(compare(CompareOp::Lt)),
            Operator::Lte => Some(compare(CompareOp::Lte)),
            Operator::In | Operator::Nin => Some(Expression::In {
                column: field.to_string(),
                values: match operand {
                    Value::Array(items) => items.clone(),
                    single => vec![single.clone()],
                },
                negated: *op == Operator::Nin,
            }),
            Operator::Regex => {
                let key = self.dialect.regex_placeholder(field);
                let keyed = key.is_some();
                match key {
                    Some(key) => self.pattern_keys.push(key),
                    None => {
                        warn!(
                            "$regex on '{}' stays an equality: {} has no regex operator",
                            field,
                            self.dialect.name()
                        );
                        self.degraded.push(SkippedPredicate {
                            field: field.to_string(),
                            operator: op.token().to_string(),
                            reason: format!(
                                "{} has no regex operator; matched exactly",
                                self.dialect.name()
                            ),
                        });
                    }
                }
                Some(Expression::Pattern {
                    column: field.to_string(),
                    value: operand.clone(),
                    keyed,
                })
            }
            Operator::Contains => {
                let data = match serde_json::to_string(operand) {
                    Ok(data) => data,
                    Err(e) => {
                        error!("error marshalling $contains data for '{}': {}", field, e);
                        self.skip(field, op, format!("operand is not serializable: {}", e));
                        return None;
                    }
                };
                match self.dialect.contains_template(field) {
                    Some(sql) => Some(Expression::Raw {
                        sql,
                        args: vec![Value::String(data)],
                    }),
                    None => {
                        error!("$contains not supported for database ({})", self.dialect.name());
                        self.skip(
                            field,
                            op,
                            format!("$contains not supported for {}", self.dialect.name()),
                        );
                        None
                    }
                }
            }
            Operator::Unsupported(token) => {
                warn!("ignoring unknown filter operator '{}' on '{}'", token, field);
                self.skip(field, op, "unknown operator".to_string());
                None
            }
        }
    }

    fn skip(&mut self, field: &str, op: &Operator, reason: String) {
        self.skipped.push(SkippedPredicate {
            field: field.to_string(),
            operator: op.token().to_string(),
            reason,
        });
    }
}
