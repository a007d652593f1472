//! Boolean compounds: AND / OR / NOT over subpredicate lists.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Predicate;

/// Logical gate over subpredicates.
///
/// `And` and `Or` take an arbitrary list. Their empty forms are the logical
/// identities under evaluation: `And([])` is always true, `Or([])` is always
/// false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "predicates", rename_all = "UPPERCASE")]
pub enum Compound {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Compound {
    pub fn keyword(&self) -> &'static str {
        match self {
            Compound::And(_) => "AND",
            Compound::Or(_) => "OR",
            Compound::Not(_) => "NOT",
        }
    }

    pub fn subpredicates(&self) -> &[Predicate] {
        match self {
            Compound::And(subpredicates) | Compound::Or(subpredicates) => subpredicates,
            Compound::Not(subpredicate) => std::slice::from_ref(subpredicate),
        }
    }

    /// Whether this node's rendering already carries its own enclosing
    /// parentheses, so a parent must not add another pair.
    fn self_parenthesized(&self) -> bool {
        match self {
            Compound::And(subpredicates) | Compound::Or(subpredicates) => {
                subpredicates.len() != 1
            }
            Compound::Not(_) => false,
        }
    }
}

fn write_subpredicate(f: &mut fmt::Formatter<'_>, predicate: &Predicate) -> fmt::Result {
    match predicate {
        Predicate::Compound(compound) if !compound.self_parenthesized() => {
            write!(f, "({compound})")
        }
        _ => write!(f, "{predicate}"),
    }
}

/// Rendering rule: a multi-child AND/OR joins its subpredicates with the
/// keyword and wraps the whole in parentheses; compound children supply (or
/// are given) their own pair, leaves stay bare. A single-child compound
/// prefixes the keyword instead, and an empty one renders a fixed
/// placeholder.
impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compound::And(subpredicates) | Compound::Or(subpredicates) => {
                match subpredicates.as_slice() {
                    [] => write!(f, "(Empty {} predicate)", self.keyword()),
                    [only] => {
                        write!(f, "{} ", self.keyword())?;
                        write_subpredicate(f, only)
                    }
                    subpredicates => {
                        write!(f, "(")?;
                        for (i, predicate) in subpredicates.iter().enumerate() {
                            if i > 0 {
                                write!(f, " {} ", self.keyword())?;
                            }
                            write_subpredicate(f, predicate)?;
                        }
                        write!(f, ")")
                    }
                }
            }
            Compound::Not(subpredicate) => {
                write!(f, "NOT ")?;
                write_subpredicate(f, subpredicate)
            }
        }
    }
}
