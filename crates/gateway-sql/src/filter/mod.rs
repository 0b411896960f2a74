//! Canonical filter compilation.
//!
//! Compilation runs in two steps:
//!
//! 1. [`Filter::parse`] turns the untyped filter object into a typed AST and
//!    rejects malformed shapes.
//! 2. [`compile`] lowers the AST into an [`Expression`] for one dialect, plus
//!    the list of regex pattern keys and any predicates it had to drop.
//!
//! Regex predicates cannot be expressed through the generic predicate
//! builder, so they are rendered as equalities and patched afterwards (see
//! [`crate::statement::apply_pattern_keys`]). Pattern keys are recorded in
//! the same depth-first order in which predicates are rendered, including
//! inside `$or` branches.

mod ast;
mod compile;
mod expr;

pub use ast::{Filter, Operator, Predicate, OR_KEY};
pub use compile::{compile, compile_value, Compiled, SkippedPredicate};
pub use expr::{CompareOp, Expression, Rendered, SqlWriter};
