//! Backend canonicalization.
//!
//! Backends translate the tree node by node into their native filter form.
//! Before handing a tree over, one structural rewrite is required:
//! relationship equality on the backend side is always identifier equality,
//! so a comparison whose right side is a relationship constant and whose
//! left key path names a relationship property gets the identifier property
//! appended (`events == {1, 2}` becomes `events.id == {1, 2}`).

use crate::model::PropertyKey;
use crate::schema::EntityDescription;

use super::comparison::Comparison;
use super::compound::Compound;
use super::expression::{Expression, Key};
use super::Predicate;

impl Predicate {
    /// Canonicalize for backend translation against one entity's schema.
    ///
    /// `identifier_key` is the property name the backend stores identifiers
    /// under, normally the coding options' identifier key.
    pub fn for_backend(
        &self,
        entity: &EntityDescription,
        identifier_key: &PropertyKey,
    ) -> Predicate {
        match self {
            Predicate::Value(value) => Predicate::Value(*value),
            Predicate::Comparison(comparison) => {
                Predicate::Comparison(rewrite(comparison, entity, identifier_key))
            }
            Predicate::Compound(compound) => Predicate::Compound(match compound {
                Compound::And(subpredicates) => Compound::And(
                    subpredicates
                        .iter()
                        .map(|p| p.for_backend(entity, identifier_key))
                        .collect(),
                ),
                Compound::Or(subpredicates) => Compound::Or(
                    subpredicates
                        .iter()
                        .map(|p| p.for_backend(entity, identifier_key))
                        .collect(),
                ),
                Compound::Not(subpredicate) => {
                    Compound::Not(Box::new(subpredicate.for_backend(entity, identifier_key)))
                }
            }),
        }
    }
}

fn rewrite(
    comparison: &Comparison,
    entity: &EntityDescription,
    identifier_key: &PropertyKey,
) -> Comparison {
    let mut comparison = comparison.clone();

    let Expression::Relationship(_) = comparison.right else {
        return comparison;
    };
    let Expression::KeyPath(path) = &comparison.left else {
        return comparison;
    };
    let Some(leading) = path.leading_property() else {
        return comparison;
    };
    if entity.relationship(leading).is_none() {
        return comparison;
    }
    if path.last() == Some(&Key::Property(identifier_key.clone())) {
        return comparison;
    }

    comparison.left =
        Expression::KeyPath(path.appending(Key::Property(identifier_key.clone())));
    comparison
}
