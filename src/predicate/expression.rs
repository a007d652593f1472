//! Expressions and key paths — the operands of a comparison.
//!
//! An `Expression` is either a constant (attribute or relationship value) or
//! a key path resolved against the record under evaluation. Key paths are
//! parsed from dot-separated strings; a numeric segment is an array index and
//! an `@`-prefixed segment naming a known aggregate is an aggregate operator
//! applied to the remainder of the path evaluated as a collection
//! (`"speakers.@count"`).

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{AttributeValue, PropertyKey, RelationshipValue};

use super::comparison::{Comparison, ComparisonModifier, ComparisonOperator, ComparisonOption};
use super::Predicate;

// ============================================================================
// Aggregate operators
// ============================================================================

/// Collection aggregate applied inside a key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aggregate {
    Count,
    Sum,
    Min,
    Max,
    Average,
}

impl Aggregate {
    pub fn code(&self) -> &'static str {
        match self {
            Aggregate::Count => "@count",
            Aggregate::Sum => "@sum",
            Aggregate::Min => "@min",
            Aggregate::Max => "@max",
            Aggregate::Average => "@avg",
        }
    }

    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "@count" => Some(Aggregate::Count),
            "@sum" => Some(Aggregate::Sum),
            "@min" => Some(Aggregate::Min),
            "@max" => Some(Aggregate::Max),
            "@avg" => Some(Aggregate::Average),
            _ => None,
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Key path
// ============================================================================

/// One segment of a key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Property(PropertyKey),
    Index(u32),
    Aggregate(Aggregate),
}

impl Key {
    /// Segment classification: digits are an index, a known `@` operator is
    /// an aggregate, anything else (including unknown `@` segments) is a
    /// property name.
    pub fn parse(segment: &str) -> Self {
        if let Ok(index) = segment.parse::<u32>() {
            Key::Index(index)
        } else if let Some(aggregate) = Aggregate::parse(segment) {
            Key::Aggregate(aggregate)
        } else {
            Key::Property(PropertyKey::from(segment))
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Property(key) => key.fmt(f),
            Key::Index(index) => index.fmt(f),
            Key::Aggregate(aggregate) => aggregate.fmt(f),
        }
    }
}

/// Non-empty ordered sequence of keys, e.g. `events.0.@count`.
///
/// Serialized as its dot-separated string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct KeyPath {
    keys: SmallVec<[Key; 4]>,
}

impl KeyPath {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self { keys: keys.into_iter().collect() }
    }

    pub fn parse(raw: &str) -> Self {
        Self {
            keys: raw.split('.').filter(|s| !s.is_empty()).map(Key::parse).collect(),
        }
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn append(&mut self, key: Key) {
        self.keys.push(key);
    }

    pub fn appending(&self, key: Key) -> Self {
        let mut path = self.clone();
        path.append(key);
        path
    }

    /// First segment, if it names a property.
    pub fn leading_property(&self) -> Option<&PropertyKey> {
        match self.keys.first() {
            Some(Key::Property(key)) => Some(key),
            _ => None,
        }
    }

    pub fn last(&self) -> Option<&Key> {
        self.keys.last()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl From<&str> for KeyPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for KeyPath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.to_string()
    }
}

// ============================================================================
// Expression
// ============================================================================

/// Operand of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "expression", rename_all = "camelCase")]
pub enum Expression {
    /// Constant scalar value.
    Attribute(AttributeValue),
    /// Constant reference value.
    Relationship(RelationshipValue),
    /// Key path resolved against the record under evaluation.
    KeyPath(KeyPath),
}

impl Expression {
    pub fn key_path(path: impl Into<KeyPath>) -> Self {
        Expression::KeyPath(path.into())
    }

    pub fn attribute(value: impl Into<AttributeValue>) -> Self {
        Expression::Attribute(value.into())
    }

    pub fn relationship(value: impl Into<RelationshipValue>) -> Self {
        Expression::Relationship(value.into())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Attribute(value) => value.fmt(f),
            Expression::Relationship(value) => value.fmt(f),
            Expression::KeyPath(path) => path.fmt(f),
        }
    }
}

impl From<AttributeValue> for Expression {
    fn from(value: AttributeValue) -> Self {
        Expression::Attribute(value)
    }
}

impl From<RelationshipValue> for Expression {
    fn from(value: RelationshipValue) -> Self {
        Expression::Relationship(value)
    }
}

impl From<KeyPath> for Expression {
    fn from(path: KeyPath) -> Self {
        Expression::KeyPath(path)
    }
}

macro_rules! expression_from_attribute {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::Attribute(value.into())
                }
            }
        )*
    };
}

expression_from_attribute! {
    bool, i16, i32, i64, f32, f64, String, &str,
    uuid::Uuid, url::Url, Vec<u8>, chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// Comparison builders
// ============================================================================

impl Expression {
    /// General form: operator only.
    pub fn compare(self, operator: ComparisonOperator, rhs: impl Into<Expression>) -> Predicate {
        Predicate::Comparison(Comparison::new(self, operator, rhs.into()))
    }

    /// Operator plus string-comparison options.
    pub fn compare_with_options(
        self,
        operator: ComparisonOperator,
        options: impl IntoIterator<Item = ComparisonOption>,
        rhs: impl Into<Expression>,
    ) -> Predicate {
        Predicate::Comparison(Comparison::new(self, operator, rhs.into()).with_options(options))
    }

    /// Fully general form: modifier, operator, and options.
    pub fn compare_full(
        self,
        modifier: ComparisonModifier,
        operator: ComparisonOperator,
        options: impl IntoIterator<Item = ComparisonOption>,
        rhs: impl Into<Expression>,
    ) -> Predicate {
        Predicate::Comparison(
            Comparison::new(self, operator, rhs.into())
                .with_modifier(modifier)
                .with_options(options),
        )
    }

    pub fn eq(self, rhs: impl Into<Expression>) -> Predicate {
        self.compare(ComparisonOperator::Equal, rhs)
    }

    pub fn ne(self, rhs: impl Into<Expression>) -> Predicate {
        self.compare(ComparisonOperator::NotEqual, rhs)
    }

    pub fn lt(self, rhs: impl Into<Expression>) -> Predicate {
        self.compare(ComparisonOperator::LessThan, rhs)
    }

    pub fn le(self, rhs: impl Into<Expression>) -> Predicate {
        self.compare(ComparisonOperator::LessThanEqual, rhs)
    }

    pub fn gt(self, rhs: impl Into<Expression>) -> Predicate {
        self.compare(ComparisonOperator::GreaterThan, rhs)
    }

    pub fn ge(self, rhs: impl Into<Expression>) -> Predicate {
        self.compare(ComparisonOperator::GreaterThanEqual, rhs)
    }

    pub fn contains(self, rhs: impl Into<Expression>) -> Predicate {
        self.compare(ComparisonOperator::Contains, rhs)
    }

    pub fn is_in(self, rhs: impl Into<Expression>) -> Predicate {
        self.compare(ComparisonOperator::In, rhs)
    }
}
