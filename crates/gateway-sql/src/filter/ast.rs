//! Typed filter AST and the parse step from untyped JSON.
//!
//! A canonical filter object is a JSON object whose keys are field names (or
//! `$or`) and whose values are either literals (equality) or operator
//! mappings such as `{"$gte": 18, "$lt": 65}`. Parsing happens once, here;
//! the compiler only ever sees [`Filter`].

use std::fmt;

use serde_json::{Map, Value};

use crate::core::identifier::validate_filter_field;
use crate::core::traits::Dialect;
use crate::error::{GatewayError, Result};

/// Reserved key combining an array of filter objects disjunctively.
pub const OR_KEY: &str = "$or";

/// Operator tokens of an operator mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Regex,
    Contains,
    /// Any other token. Compiled as a skipped predicate.
    Unsupported(String),
}

impl Operator {
    pub fn parse(token: &str) -> Self {
        match token {
            "$eq" => Operator::Eq,
            "$ne" => Operator::Ne,
            "$gt" => Operator::Gt,
            "$gte" => Operator::Gte,
            "$lt" => Operator::Lt,
            "$lte" => Operator::Lte,
            "$in" => Operator::In,
            "$nin" => Operator::Nin,
            "$regex" => Operator::Regex,
            "$contains" => Operator::Contains,
            other => Operator::Unsupported(other.to_string()),
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::In => "$in",
            Operator::Nin => "$nin",
            Operator::Regex => "$regex",
            Operator::Contains => "$contains",
            Operator::Unsupported(token) => token,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Condition on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Plain value, meaning equality.
    Literal(Value),
    /// One entry of an operator mapping.
    Compare { op: Operator, operand: Value },
}

/// Parsed filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Field { field: String, predicate: Predicate },
}

impl Filter {
    /// Filter that matches everything.
    pub fn empty() -> Self {
        Filter::And(Vec::new())
    }

    /// Parse a canonical filter object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFilterShape` when the input or an `$or` element is not
    /// an object, when `$or` is not a non-empty array, or when a field name
    /// is not a valid identifier.
    pub fn parse(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::parse_object(map, ""),
            other => Err(GatewayError::filter_shape(
                "",
                format!("expected an object, got {}", json_kind(other)),
            )),
        }
    }

    fn parse_object(map: &Map<String, Value>, path: &str) -> Result<Self> {
        let mut parts = Vec::with_capacity(map.len());

        for (key, value) in map {
            let key_path = join_path(path, key);

            if key == OR_KEY {
                parts.push(Self::parse_or(value, &key_path)?);
                continue;
            }

            validate_filter_field(&key_path, key)?;

            match value {
                Value::Object(ops) => {
                    for (token, operand) in ops {
                        parts.push(Filter::Field {
                            field: key.clone(),
                            predicate: Predicate::Compare {
                                op: Operator::parse(token),
                                operand: operand.clone(),
                            },
                        });
                    }
                }
                literal => parts.push(Filter::Field {
                    field: key.clone(),
                    predicate: Predicate::Literal(literal.clone()),
                }),
            }
        }

        Ok(Filter::And(parts))
    }

    fn parse_or(value: &Value, path: &str) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(GatewayError::filter_shape(
                    path,
                    format!("expected an array, got {}", json_kind(other)),
                ))
            }
        };

        if items.is_empty() {
            return Err(GatewayError::filter_shape(path, "array must not be empty"));
        }

        let mut branches = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            match item {
                Value::Object(map) => branches.push(Self::parse_object(map, &item_path)?),
                other => {
                    return Err(GatewayError::filter_shape(
                        item_path,
                        format!("expected an object, got {}", json_kind(other)),
                    ))
                }
            }
        }

        Ok(Filter::Or(branches))
    }

    /// True when the filter places no restriction at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::And(parts) => parts.iter().all(Filter::is_empty),
            Filter::Or(_) | Filter::Field { .. } => false,
        }
    }

    /// Rewrite every field name with `f`.
    pub fn map_fields(self, f: &impl Fn(&str) -> String) -> Self {
        match self {
            Filter::And(parts) => Filter::And(parts.into_iter().map(|p| p.map_fields(f)).collect()),
            Filter::Or(parts) => Filter::Or(parts.into_iter().map(|p| p.map_fields(f)).collect()),
            Filter::Field { field, predicate } => Filter::Field {
                field: f(&field),
                predicate,
            },
        }
    }

    /// Qualify every bare field with `collection`.
    ///
    /// Dotted names (`orders.total`) already name their collection and are
    /// left as written.
    pub fn qualified(self, dialect: &dyn Dialect, collection: &str) -> Self {
        self.map_fields(&|field| {
            if field.contains('.') {
                field.to_string()
            } else {
                dialect.qualify(collection, field)
            }
        })
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
