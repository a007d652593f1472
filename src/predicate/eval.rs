//! In-memory predicate evaluation.
//!
//! Pure and synchronous: one record in, `Result<bool>` out. Evaluation is a
//! short-circuit walk over the tree. Comparisons that are not defined for
//! their operands (cross-case operands, ordering against null, `BETWEEN`)
//! fail with [`Error::UnsupportedComparison`] instead of quietly excluding
//! the record; the single exception is equality against null, which is
//! defined for every case.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use regex::RegexBuilder;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::{AttributeValue, ModelData, PropertyKey, RelationshipValue};
use crate::{Error, Result};

use super::comparison::{Comparison, ComparisonModifier, ComparisonOperator, ComparisonOption};
use super::compound::Compound;
use super::expression::{Aggregate, Expression, Key, KeyPath};
use super::Predicate;

impl Predicate {
    /// Evaluate against a single record, treating `"id"` as the identifier
    /// key.
    pub fn evaluate(&self, data: &ModelData) -> Result<bool> {
        self.evaluate_with_identifier_key(data, &PropertyKey::from("id"))
    }

    /// Evaluate with a custom identifier key, for records encoded under
    /// non-default coding options.
    pub fn evaluate_with_identifier_key(
        &self,
        data: &ModelData,
        identifier_key: &PropertyKey,
    ) -> Result<bool> {
        match self {
            Predicate::Value(value) => Ok(*value),
            Predicate::Comparison(comparison) => comparison.evaluate(data, identifier_key),
            Predicate::Compound(compound) => match compound {
                Compound::And(subpredicates) => {
                    for predicate in subpredicates {
                        if !predicate.evaluate_with_identifier_key(data, identifier_key)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                Compound::Or(subpredicates) => {
                    for predicate in subpredicates {
                        if predicate.evaluate_with_identifier_key(data, identifier_key)? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                Compound::Not(subpredicate) => {
                    Ok(!subpredicate.evaluate_with_identifier_key(data, identifier_key)?)
                }
            },
        }
    }
}

// ============================================================================
// Operand resolution
// ============================================================================

/// Resolved form of an expression: a scalar or a collection. To-one
/// references resolve to their identifier string, to-many to a collection of
/// identifier strings, so identifiers and string constants compare directly.
enum Operand {
    Value(AttributeValue),
    Collection(Vec<AttributeValue>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(value) => value.fmt(f),
            Operand::Collection(values) => {
                write!(f, "{{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn resolve(
    data: &ModelData,
    expression: &Expression,
    identifier_key: &PropertyKey,
) -> Result<Operand> {
    match expression {
        Expression::Attribute(value) => Ok(Operand::Value(value.clone())),
        Expression::Relationship(value) => Ok(reference_operand(value)),
        Expression::KeyPath(path) => resolve_key_path(data, path, identifier_key),
    }
}

fn reference_operand(value: &RelationshipValue) -> Operand {
    match value {
        RelationshipValue::Null => Operand::Value(AttributeValue::Null),
        RelationshipValue::ToOne(id) => {
            Operand::Value(AttributeValue::String(id.as_str().to_owned()))
        }
        RelationshipValue::ToMany(ids) => Operand::Collection(
            ids.iter()
                .map(|id| AttributeValue::String(id.as_str().to_owned()))
                .collect(),
        ),
    }
}

/// Walk a key path against one record.
///
/// The leading key must name a property, with the identifier key resolving
/// to the record identifier. An unknown property resolves to null (records
/// are sparse); subsequent keys may only index into or count a collection.
/// Anything else is an invalid path for single-record evaluation, including
/// traversal into another record (`events.name`) and the numeric aggregates,
/// which need the destination records this walk does not have.
fn resolve_key_path(
    data: &ModelData,
    path: &KeyPath,
    identifier_key: &PropertyKey,
) -> Result<Operand> {
    let invalid = || Error::InvalidKeyPath(path.to_string());

    let mut keys = path.keys().iter();
    let first = match keys.next() {
        Some(Key::Property(key)) => key,
        _ => return Err(invalid()),
    };

    let mut current = if let Some(value) = data.attribute(first) {
        Operand::Value(value.clone())
    } else if let Some(value) = data.relationship(first) {
        reference_operand(value)
    } else if first == identifier_key {
        Operand::Value(AttributeValue::String(data.id.as_str().to_owned()))
    } else {
        Operand::Value(AttributeValue::Null)
    };

    for key in keys {
        current = match (key, current) {
            (Key::Index(index), Operand::Collection(values)) => Operand::Value(
                values
                    .get(*index as usize)
                    .cloned()
                    .unwrap_or(AttributeValue::Null),
            ),
            (Key::Aggregate(Aggregate::Count), Operand::Collection(values)) => {
                Operand::Value(AttributeValue::Int64(values.len() as i64))
            }
            (Key::Aggregate(Aggregate::Count), Operand::Value(AttributeValue::Null)) => {
                Operand::Value(AttributeValue::Int64(0))
            }
            _ => return Err(invalid()),
        };
    }
    Ok(current)
}

// ============================================================================
// Comparison evaluation
// ============================================================================

impl Comparison {
    fn evaluate(&self, data: &ModelData, identifier_key: &PropertyKey) -> Result<bool> {
        let left = resolve(data, &self.left, identifier_key)?;
        let right = resolve(data, &self.right, identifier_key)?;

        match self.modifier {
            None => apply(self.operator, &left, &right, &self.options),
            Some(modifier) => {
                let Operand::Collection(elements) = &left else {
                    return Err(unsupported(self.operator, &left, &right));
                };
                for element in elements {
                    let matched = apply(
                        self.operator,
                        &Operand::Value(element.clone()),
                        &right,
                        &self.options,
                    )?;
                    match modifier {
                        ComparisonModifier::All if !matched => return Ok(false),
                        ComparisonModifier::Any if matched => return Ok(true),
                        _ => {}
                    }
                }
                // ALL over nothing is vacuously true, ANY is false.
                Ok(modifier == ComparisonModifier::All)
            }
        }
    }
}

fn unsupported(operator: ComparisonOperator, left: &Operand, right: &Operand) -> Error {
    Error::UnsupportedComparison {
        left: left.to_string(),
        operator: operator.as_str().to_owned(),
        right: right.to_string(),
    }
}

fn apply(
    operator: ComparisonOperator,
    left: &Operand,
    right: &Operand,
    options: &BTreeSet<ComparisonOption>,
) -> Result<bool> {
    use ComparisonOperator::*;
    let err = || unsupported(operator, left, right);

    match operator {
        Equal => operand_eq(left, right, options).ok_or_else(err),
        NotEqual => operand_eq(left, right, options).map(|eq| !eq).ok_or_else(err),

        LessThan | LessThanEqual | GreaterThan | GreaterThanEqual => {
            let ordering = order(left, right, options).ok_or_else(err)?;
            Ok(match operator {
                LessThan => ordering == Ordering::Less,
                LessThanEqual => ordering != Ordering::Greater,
                GreaterThan => ordering == Ordering::Greater,
                GreaterThanEqual => ordering != Ordering::Less,
                _ => unreachable!(),
            })
        }

        BeginsWith => {
            let (a, b) = strings(left, right).ok_or_else(err)?;
            Ok(fold(a, options).starts_with(fold(b, options).as_ref()))
        }
        EndsWith => {
            let (a, b) = strings(left, right).ok_or_else(err)?;
            Ok(fold(a, options).ends_with(fold(b, options).as_ref()))
        }

        Contains => match (left, right) {
            (Operand::Collection(elements), Operand::Value(value)) => {
                contains(elements, value, options).ok_or_else(err)
            }
            _ => {
                let (a, b) = strings(left, right).ok_or_else(err)?;
                Ok(fold(a, options).contains(fold(b, options).as_ref()))
            }
        },
        In => match (left, right) {
            (Operand::Value(value), Operand::Collection(elements)) => {
                contains(elements, value, options).ok_or_else(err)
            }
            _ => {
                let (a, b) = strings(left, right).ok_or_else(err)?;
                Ok(fold(b, options).contains(fold(a, options).as_ref()))
            }
        },

        Matches => {
            let (haystack, pattern) = strings(left, right).ok_or_else(err)?;
            regex_match(haystack, pattern, false, options).ok_or_else(err)
        }
        Like => {
            let (haystack, pattern) = strings(left, right).ok_or_else(err)?;
            let pattern = glob_to_regex(fold(pattern, options).as_ref());
            regex_match(haystack, &pattern, true, options).ok_or_else(err)
        }

        // Range semantics are a backend concern; no in-memory form.
        Between => Err(err()),
    }
}

fn strings<'a>(left: &'a Operand, right: &'a Operand) -> Option<(&'a str, &'a str)> {
    match (left, right) {
        (Operand::Value(a), Operand::Value(b)) => Some((a.as_str()?, b.as_str()?)),
        _ => None,
    }
}

fn contains(
    elements: &[AttributeValue],
    value: &AttributeValue,
    options: &BTreeSet<ComparisonOption>,
) -> Option<bool> {
    for element in elements {
        if value_eq(element, value, options)? {
            return Some(true);
        }
    }
    Some(false)
}

/// Equality against null is defined for every case; between two non-null
/// operands it is defined only within the same case. `None` marks a
/// cross-case (or scalar-vs-collection) pair the caller reports as
/// unsupported.
fn operand_eq(
    left: &Operand,
    right: &Operand,
    options: &BTreeSet<ComparisonOption>,
) -> Option<bool> {
    match (left, right) {
        (Operand::Value(a), Operand::Value(b)) => value_eq(a, b, options),
        (Operand::Collection(a), Operand::Collection(b)) => {
            if a.len() != b.len() {
                return Some(false);
            }
            for (a, b) in a.iter().zip(b) {
                if !value_eq(a, b, options)? {
                    return Some(false);
                }
            }
            Some(true)
        }
        (Operand::Value(AttributeValue::Null), Operand::Collection(_))
        | (Operand::Collection(_), Operand::Value(AttributeValue::Null)) => Some(false),
        _ => None,
    }
}

fn value_eq(
    a: &AttributeValue,
    b: &AttributeValue,
    options: &BTreeSet<ComparisonOption>,
) -> Option<bool> {
    if a.is_null() || b.is_null() {
        return Some(a.is_null() && b.is_null());
    }
    match (a, b) {
        (AttributeValue::String(a), AttributeValue::String(b)) => {
            Some(fold(a, options) == fold(b, options))
        }
        _ if std::mem::discriminant(a) == std::mem::discriminant(b) => Some(a == b),
        _ => None,
    }
}

/// Ordering is partial: `None` for null, cross-case, and NaN operands.
fn order(
    left: &Operand,
    right: &Operand,
    options: &BTreeSet<ComparisonOption>,
) -> Option<Ordering> {
    let (Operand::Value(a), Operand::Value(b)) = (left, right) else {
        return None;
    };
    if a.is_null() || b.is_null() {
        return None;
    }
    match (a, b) {
        (AttributeValue::String(a), AttributeValue::String(b)) => {
            Some(fold(a, options).cmp(&fold(b, options)))
        }
        _ => a.same_case_cmp(b),
    }
}

// ============================================================================
// String folding and pattern matching
// ============================================================================

/// Apply case/diacritic folding per the comparison options. `normalized`
/// asserts the operands are preprocessed, so folding is skipped entirely;
/// `localeSensitive` has no locale table to consult here and is ignored
/// (ordinal comparison).
fn fold<'a>(s: &'a str, options: &BTreeSet<ComparisonOption>) -> Cow<'a, str> {
    if options.contains(&ComparisonOption::Normalized) {
        return Cow::Borrowed(s);
    }
    let mut folded = Cow::Borrowed(s);
    if options.contains(&ComparisonOption::DiacriticInsensitive) {
        folded = Cow::Owned(folded.nfd().filter(|c| !is_combining_mark(*c)).collect());
    }
    if options.contains(&ComparisonOption::CaseInsensitive) {
        folded = Cow::Owned(folded.to_lowercase());
    }
    folded
}

/// `None` when the pattern fails to compile, reported by the caller as an
/// unsupported comparison. Case-insensitivity goes through the regex engine
/// rather than pre-lowering the pattern, which would corrupt escapes;
/// diacritic folding applies to the haystack only for the same reason.
fn regex_match(
    haystack: &str,
    pattern: &str,
    anchored: bool,
    options: &BTreeSet<ComparisonOption>,
) -> Option<bool> {
    let case_insensitive = options.contains(&ComparisonOption::CaseInsensitive)
        && !options.contains(&ComparisonOption::Normalized);
    let diacritic_options: BTreeSet<_> = options
        .iter()
        .copied()
        .filter(|o| *o == ComparisonOption::DiacriticInsensitive)
        .collect();
    let haystack = fold(haystack, &diacritic_options);

    let pattern = if anchored {
        Cow::Owned(format!("^(?:{pattern})$"))
    } else {
        Cow::Borrowed(pattern)
    };
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(case_insensitive)
        .build()
        .ok()?;
    Some(regex.is_match(&haystack))
}

/// `?` matches one character, `*` any run, everything else is literal.
fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() + 8);
    for c in glob.chars() {
        match c {
            '?' => pattern.push('.'),
            '*' => pattern.push_str(".*"),
            c => pattern.push_str(&regex::escape(&c.to_string())),
        }
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectId;
    use crate::predicate::Expression;

    fn record() -> ModelData {
        ModelData::new("Person", "1")
            .with_attribute("name", "José Coleman")
            .with_attribute("age", 30i64)
            .with_attribute("score", 1.5f64)
            .with_attribute("nickname", AttributeValue::Null)
            .with_relationship(
                "events",
                vec![ObjectId::from("100"), ObjectId::from("200")],
            )
    }

    #[test]
    fn test_literal_and_compound_short_circuit() {
        let data = record();
        assert!(Predicate::from(true).evaluate(&data).unwrap());
        assert!(Predicate::and(vec![]).evaluate(&data).unwrap());
        assert!(!Predicate::or(vec![]).evaluate(&data).unwrap());

        // The failing comparison after a false arm is never reached.
        let guarded = Predicate::and(vec![
            Predicate::from(false),
            Expression::key_path("age").lt("not a number"),
        ]);
        assert!(!guarded.evaluate(&data).unwrap());
    }

    #[test]
    fn test_null_equality_is_defined() {
        let data = record();
        assert!(Expression::key_path("age").eq(30i64).evaluate(&data).unwrap());
        assert!(Expression::key_path("nickname")
            .eq(AttributeValue::Null)
            .evaluate(&data)
            .unwrap());
        assert!(!Expression::key_path("age")
            .eq(AttributeValue::Null)
            .evaluate(&data)
            .unwrap());
        // Missing keys resolve to null.
        assert!(Expression::key_path("missing")
            .eq(AttributeValue::Null)
            .evaluate(&data)
            .unwrap());
    }

    #[test]
    fn test_cross_case_equality_is_an_error() {
        let data = record();
        // The stored age is Int64; an Int32 constant never silently misses.
        assert!(matches!(
            Expression::key_path("age").eq(30i32).evaluate(&data),
            Err(Error::UnsupportedComparison { .. })
        ));
        assert!(matches!(
            Expression::key_path("age").ne(30i32).evaluate(&data),
            Err(Error::UnsupportedComparison { .. })
        ));
    }

    #[test]
    fn test_custom_identifier_key() {
        let data = record();
        let key = PropertyKey::from("personId");
        assert!(Expression::key_path("personId")
            .eq("1")
            .evaluate_with_identifier_key(&data, &key)
            .unwrap());
        // "id" is just another absent property now, resolving to null.
        assert!(!Expression::key_path("id")
            .eq("1")
            .evaluate_with_identifier_key(&data, &key)
            .unwrap());
    }

    #[test]
    fn test_locale_sensitive_ordering_is_ordinal() {
        let data = ModelData::new("Person", "1").with_attribute("name", "a");
        let predicate = Expression::key_path("name").compare_with_options(
            ComparisonOperator::LessThan,
            [ComparisonOption::LocaleSensitive],
            "B",
        );
        // Ordinal: 'a' (0x61) sorts after 'B' (0x42); a locale-aware
        // collation would say the opposite.
        assert!(!predicate.evaluate(&data).unwrap());
    }

    #[test]
    fn test_ordering_errors_are_deterministic() {
        let data = record();
        assert!(Expression::key_path("age").gt(21i64).evaluate(&data).unwrap());

        // Cross-case and null ordering fail loudly.
        assert!(matches!(
            Expression::key_path("age").gt(21i16).evaluate(&data),
            Err(Error::UnsupportedComparison { .. })
        ));
        assert!(matches!(
            Expression::key_path("nickname").lt("z").evaluate(&data),
            Err(Error::UnsupportedComparison { .. })
        ));
        assert!(matches!(
            Expression::key_path("age")
                .compare(ComparisonOperator::Between, 21i64)
                .evaluate(&data),
            Err(Error::UnsupportedComparison { .. })
        ));
    }

    #[test]
    fn test_string_operators_fold_options() {
        let data = record();
        let begins = Expression::key_path("name").compare_with_options(
            ComparisonOperator::BeginsWith,
            [
                ComparisonOption::CaseInsensitive,
                ComparisonOption::DiacriticInsensitive,
            ],
            "JOSE",
        );
        assert!(begins.evaluate(&data).unwrap());

        // Without folding the accent does not match.
        let strict = Expression::key_path("name").compare(ComparisonOperator::BeginsWith, "Jose");
        assert!(!strict.evaluate(&data).unwrap());

        let contains = Expression::key_path("name").contains("Cole");
        assert!(contains.evaluate(&data).unwrap());
    }

    #[test]
    fn test_matches_and_like() {
        let data = record();
        let matches = Expression::key_path("name").compare(ComparisonOperator::Matches, "Cole.an$");
        assert!(matches.evaluate(&data).unwrap());

        let like = Expression::key_path("name").compare_with_options(
            ComparisonOperator::Like,
            [ComparisonOption::DiacriticInsensitive],
            "Jose*man",
        );
        assert!(like.evaluate(&data).unwrap());

        // LIKE is anchored: a bare substring glob does not match.
        let partial = Expression::key_path("name").compare(ComparisonOperator::Like, "Cole*");
        assert!(!partial.evaluate(&data).unwrap());

        let bad = Expression::key_path("name").compare(ComparisonOperator::Matches, "(unclosed");
        assert!(matches!(
            bad.evaluate(&data),
            Err(Error::UnsupportedComparison { .. })
        ));
    }

    #[test]
    fn test_collection_membership() {
        let data = record();
        let contains = Expression::key_path("events").contains("100");
        assert!(contains.evaluate(&data).unwrap());

        let is_in = Expression::key_path("id")
            .is_in(RelationshipValue::ToMany(vec!["1".into(), "2".into()]));
        assert!(is_in.evaluate(&data).unwrap());
    }

    #[test]
    fn test_count_aggregate() {
        let data = record();
        let count = Expression::key_path("events.@count").eq(2i64);
        assert!(count.evaluate(&data).unwrap());

        // A null to-many counts as zero.
        let empty = ModelData::new("Person", "2")
            .with_relationship("events", RelationshipValue::Null);
        let none = Expression::key_path("events.@count").eq(0i64);
        assert!(none.evaluate(&empty).unwrap());

        // Numeric aggregates need destination records this walk lacks.
        assert!(matches!(
            Expression::key_path("events.@sum").eq(0i64).evaluate(&data),
            Err(Error::InvalidKeyPath(_))
        ));
    }

    #[test]
    fn test_index_key() {
        let data = record();
        let first = Expression::key_path("events.0").eq("100");
        assert!(first.evaluate(&data).unwrap());
        let out_of_range = Expression::key_path("events.9").eq(AttributeValue::Null);
        assert!(out_of_range.evaluate(&data).unwrap());
    }

    #[test]
    fn test_modifiers_distribute() {
        let data = record();
        let any = Expression::key_path("events").compare_full(
            ComparisonModifier::Any,
            ComparisonOperator::Equal,
            [],
            "200",
        );
        assert!(any.evaluate(&data).unwrap());

        let all = Expression::key_path("events").compare_full(
            ComparisonModifier::All,
            ComparisonOperator::Equal,
            [],
            "100",
        );
        assert!(!all.evaluate(&data).unwrap());

        // ALL over an empty collection is vacuously true.
        let empty = ModelData::new("Person", "2").with_relationship("events", Vec::<ObjectId>::new());
        let all_empty = Expression::key_path("events").compare_full(
            ComparisonModifier::All,
            ComparisonOperator::Equal,
            [],
            "100",
        );
        assert!(all_empty.evaluate(&empty).unwrap());

        // A modifier needs a collection on the left.
        let scalar = Expression::key_path("age").compare_full(
            ComparisonModifier::Any,
            ComparisonOperator::Equal,
            [],
            30i64,
        );
        assert!(matches!(
            scalar.evaluate(&data),
            Err(Error::UnsupportedComparison { .. })
        ));
    }

    #[test]
    fn test_double_negation() {
        let data = record();
        let p = Expression::key_path("age").eq(30i64);
        assert_eq!(
            (!!p.clone()).evaluate(&data).unwrap(),
            p.evaluate(&data).unwrap()
        );
    }

    #[test]
    fn test_traversal_into_other_records_is_invalid() {
        let data = record();
        assert!(matches!(
            Expression::key_path("events.name").eq("x").evaluate(&data),
            Err(Error::InvalidKeyPath(_))
        ));
    }
}
