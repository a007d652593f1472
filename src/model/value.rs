//! Tagged-union property values.
//!
//! `AttributeValue` is the closed set of scalar cases a backend must be able
//! to persist; `RelationshipValue` carries identifier references only —
//! cross-entity graphs are never embedded.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::ObjectId;

/// Scalar value of one attribute.
///
/// The union is closed: backends dispatch exhaustively on it and the bridge
/// maps each supported primitive onto exactly one case. Comparisons are
/// defined only within the same case (see `same_case_cmp`); the predicate
/// evaluator reports cross-case operands as errors instead of coercing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AttributeValue {
    Null,
    String(String),
    Uuid(Uuid),
    Url(Url),
    Binary(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
}

/// Reference value of one relationship.
///
/// `ToMany` is ordered and permits duplicates; uniqueness is a backend
/// concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum RelationshipValue {
    Null,
    ToOne(ObjectId),
    ToMany(Vec<ObjectId>),
}

// ============================================================================
// Type checking
// ============================================================================

impl AttributeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::String(_) => "string",
            AttributeValue::Uuid(_) => "uuid",
            AttributeValue::Url(_) => "url",
            AttributeValue::Binary(_) => "binary",
            AttributeValue::Timestamp(_) => "timestamp",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int16(_) => "int16",
            AttributeValue::Int32(_) => "int32",
            AttributeValue::Int64(_) => "int64",
            AttributeValue::Float(_) => "float",
            AttributeValue::Double(_) => "double",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Attempt to extract as &str
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl RelationshipValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            RelationshipValue::Null => "null",
            RelationshipValue::ToOne(_) => "toOne",
            RelationshipValue::ToMany(_) => "toMany",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RelationshipValue::Null)
    }
}

// ============================================================================
// Comparison (same-case only)
// ============================================================================

impl AttributeValue {
    /// Ordering within the same case. Returns `None` for cross-case operands,
    /// for null, and for NaN — callers turn `None` into an evaluation error,
    /// never into `false`.
    pub fn same_case_cmp(&self, other: &AttributeValue) -> Option<Ordering> {
        use AttributeValue::*;
        match (self, other) {
            (String(a), String(b)) => Some(a.cmp(b)),
            (Uuid(a), Uuid(b)) => Some(a.cmp(b)),
            (Url(a), Url(b)) => Some(a.cmp(b)),
            (Binary(a), Binary(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Int16(a), Int16(b)) => Some(a.cmp(b)),
            (Int32(a), Int32(b)) => Some(a.cmp(b)),
            (Int64(a), Int64(b)) => Some(a.cmp(b)),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Double(a), Double(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for AttributeValue { fn from(v: bool) -> Self { AttributeValue::Bool(v) } }
impl From<i16> for AttributeValue { fn from(v: i16) -> Self { AttributeValue::Int16(v) } }
impl From<i32> for AttributeValue { fn from(v: i32) -> Self { AttributeValue::Int32(v) } }
impl From<i64> for AttributeValue { fn from(v: i64) -> Self { AttributeValue::Int64(v) } }
impl From<f32> for AttributeValue { fn from(v: f32) -> Self { AttributeValue::Float(v) } }
impl From<f64> for AttributeValue { fn from(v: f64) -> Self { AttributeValue::Double(v) } }
impl From<String> for AttributeValue { fn from(v: String) -> Self { AttributeValue::String(v) } }
impl From<&str> for AttributeValue { fn from(v: &str) -> Self { AttributeValue::String(v.to_owned()) } }
impl From<Uuid> for AttributeValue { fn from(v: Uuid) -> Self { AttributeValue::Uuid(v) } }
impl From<Url> for AttributeValue { fn from(v: Url) -> Self { AttributeValue::Url(v) } }
impl From<Vec<u8>> for AttributeValue { fn from(v: Vec<u8>) -> Self { AttributeValue::Binary(v) } }
impl From<DateTime<Utc>> for AttributeValue {
    fn from(v: DateTime<Utc>) -> Self { AttributeValue::Timestamp(v) }
}
impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

impl From<ObjectId> for RelationshipValue {
    fn from(id: ObjectId) -> Self { RelationshipValue::ToOne(id) }
}
impl From<Vec<ObjectId>> for RelationshipValue {
    fn from(ids: Vec<ObjectId>) -> Self { RelationshipValue::ToMany(ids) }
}

// ============================================================================
// Display (canonical predicate rendering)
// ============================================================================

/// Fixed per-case formats: part of the canonical predicate rendering
/// contract, so two descriptively-equal predicates print identically.
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "nil"),
            AttributeValue::String(s) => write!(f, "\"{s}\""),
            AttributeValue::Uuid(u) => {
                write!(f, "{}", u.hyphenated().to_string().to_uppercase())
            }
            AttributeValue::Url(u) => write!(f, "{u}"),
            AttributeValue::Binary(b) => {
                write!(f, "0x")?;
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            AttributeValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S %z")),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Int16(i) => write!(f, "{i}"),
            AttributeValue::Int32(i) => write!(f, "{i}"),
            AttributeValue::Int64(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Double(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Display for RelationshipValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipValue::Null => write!(f, "nil"),
            RelationshipValue::ToOne(id) => write!(f, "{id}"),
            RelationshipValue::ToMany(ids) => {
                write!(f, "{{")?;
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{id}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_value_from() {
        assert_eq!(AttributeValue::from("hello"), AttributeValue::String("hello".into()));
        assert_eq!(AttributeValue::from(42i64), AttributeValue::Int64(42));
        assert_eq!(AttributeValue::from(true), AttributeValue::Bool(true));
        assert_eq!(AttributeValue::from(None::<i64>), AttributeValue::Null);
    }

    #[test]
    fn test_cross_case_comparison_is_undefined() {
        assert_eq!(
            AttributeValue::Int16(1).same_case_cmp(&AttributeValue::Int64(1)),
            None
        );
        assert_eq!(
            AttributeValue::Null.same_case_cmp(&AttributeValue::Null),
            None
        );
    }

    #[test]
    fn test_same_case_comparison() {
        assert_eq!(
            AttributeValue::Int64(1).same_case_cmp(&AttributeValue::Int64(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            AttributeValue::String("a".into()).same_case_cmp(&AttributeValue::String("a".into())),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_canonical_rendering() {
        assert_eq!(AttributeValue::from("Coleman").to_string(), "\"Coleman\"");
        assert_eq!(AttributeValue::Null.to_string(), "nil");
        assert_eq!(AttributeValue::Binary(vec![0xde, 0xad]).to_string(), "0xdead");
        let ts = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            AttributeValue::Timestamp(ts).to_string(),
            "1970-01-01 00:00:00 +0000"
        );
        assert_eq!(
            RelationshipValue::ToMany(vec!["1".into(), "2".into()]).to_string(),
            "{1, 2}"
        );
    }
}
