//! # Predicate/Expression Language
//!
//! A backend-independent filter AST. Predicates are immutable trees built
//! from comparisons and boolean compounds; combinators return new trees and
//! never mutate in place, so construction cannot fail.
//!
//! Three consumers share the same tree:
//!
//! | Consumer | Entry point |
//! |----------|-------------|
//! | Canonical rendering | `Display` (the cross-backend acceptance oracle) |
//! | In-memory evaluation | [`Predicate::evaluate`] |
//! | Backend translation | [`Predicate::for_backend`] |
//!
//! Two predicates are descriptively equal iff their renderings are
//! character-identical.

pub mod expression;
pub mod comparison;
pub mod compound;
pub mod eval;
pub mod translate;

pub use comparison::{Comparison, ComparisonModifier, ComparisonOperator, ComparisonOption};
pub use compound::Compound;
pub use expression::{Aggregate, Expression, Key, KeyPath};

use std::fmt;
use std::ops;

use serde::{Deserialize, Serialize};

/// Boolean expression tree filtering records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "predicate", rename_all = "camelCase")]
pub enum Predicate {
    Comparison(Comparison),
    Compound(Compound),
    /// Literal truth value. `Predicate::from(true)` matches everything.
    Value(bool),
}

impl Predicate {
    /// Conjunction. `and([])` is the explicit identity: always true.
    pub fn and(subpredicates: Vec<Predicate>) -> Self {
        Predicate::Compound(Compound::And(subpredicates))
    }

    /// Disjunction. `or([])` is the explicit identity: always false.
    pub fn or(subpredicates: Vec<Predicate>) -> Self {
        Predicate::Compound(Compound::Or(subpredicates))
    }

    pub fn not(subpredicate: Predicate) -> Self {
        Predicate::Compound(Compound::Not(Box::new(subpredicate)))
    }
}

impl From<bool> for Predicate {
    fn from(value: bool) -> Self {
        Predicate::Value(value)
    }
}

impl From<Comparison> for Predicate {
    fn from(comparison: Comparison) -> Self {
        Predicate::Comparison(comparison)
    }
}

impl From<Compound> for Predicate {
    fn from(compound: Compound) -> Self {
        Predicate::Compound(compound)
    }
}

// ============================================================================
// Combinator operators
// ============================================================================

impl ops::BitAnd for Predicate {
    type Output = Predicate;
    fn bitand(self, rhs: Predicate) -> Predicate {
        Predicate::and(vec![self, rhs])
    }
}

impl ops::BitOr for Predicate {
    type Output = Predicate;
    fn bitor(self, rhs: Predicate) -> Predicate {
        Predicate::or(vec![self, rhs])
    }
}

impl ops::Not for Predicate {
    type Output = Predicate;
    fn not(self) -> Predicate {
        Predicate::not(self)
    }
}

// ============================================================================
// Canonical rendering
// ============================================================================

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison(comparison) => comparison.fmt(f),
            Predicate::Compound(compound) => compound.fmt(f),
            Predicate::Value(value) => value.fmt(f),
        }
    }
}
