//! Comparison nodes: `left operator right` with optional modifier and
//! string-comparison options.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::expression::Expression;

// ============================================================================
// Operator
// ============================================================================

/// Comparison operator. Serialized and rendered as its NSPredicate-style
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    /// Full regular expression match, unanchored.
    #[serde(rename = "MATCHES")]
    Matches,
    /// Glob match (`?` one char, `*` any run), anchored at both ends.
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "BEGINSWITH")]
    BeginsWith,
    #[serde(rename = "ENDSWITH")]
    EndsWith,
    /// Left is an element of (or substring of) the right collection/string.
    #[serde(rename = "IN")]
    In,
    /// Left collection/string contains the right element/substring.
    #[serde(rename = "CONTAINS")]
    Contains,
    /// Inclusive range check. Renders and translates; in-memory evaluation
    /// reports it as unsupported.
    #[serde(rename = "BETWEEN")]
    Between,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanEqual => ">=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Matches => "MATCHES",
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::BeginsWith => "BEGINSWITH",
            ComparisonOperator::EndsWith => "ENDSWITH",
            ComparisonOperator::In => "IN",
            ComparisonOperator::Contains => "CONTAINS",
            ComparisonOperator::Between => "BETWEEN",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Modifier
// ============================================================================

/// Quantifier distributing a comparison over a to-many collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComparisonModifier {
    All,
    Any,
}

impl ComparisonModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonModifier::All => "ALL",
            ComparisonModifier::Any => "ANY",
        }
    }
}

impl fmt::Display for ComparisonModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Options
// ============================================================================

/// String-comparison option. Renders as a single-letter code; the variant
/// order matches the alphabetical code order so a `BTreeSet` iterates codes
/// already sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComparisonOption {
    #[serde(rename = "c")]
    CaseInsensitive,
    #[serde(rename = "d")]
    DiacriticInsensitive,
    /// Locale-aware ordering for `<`, `<=`, `>`, `>=`. Carried through
    /// rendering and translation; the in-memory evaluator ignores it.
    #[serde(rename = "l")]
    LocaleSensitive,
    /// Operands are already preprocessed; no folding is applied.
    #[serde(rename = "n")]
    Normalized,
}

impl ComparisonOption {
    pub fn code(&self) -> char {
        match self {
            ComparisonOption::CaseInsensitive => 'c',
            ComparisonOption::DiacriticInsensitive => 'd',
            ComparisonOption::LocaleSensitive => 'l',
            ComparisonOption::Normalized => 'n',
        }
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// A single `left operator right` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub left: Expression,
    pub right: Expression,
    #[serde(rename = "type")]
    pub operator: ComparisonOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<ComparisonModifier>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub options: BTreeSet<ComparisonOption>,
}

impl Comparison {
    pub fn new(left: Expression, operator: ComparisonOperator, right: Expression) -> Self {
        Self {
            left,
            right,
            operator,
            modifier: None,
            options: BTreeSet::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: ComparisonModifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = ComparisonOption>) -> Self {
        self.options.extend(options);
        self
    }
}

/// `[modifier ]left operator[options] right` — options as a bracketed run of
/// sorted codes immediately after the operator, no space.
impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(modifier) = &self.modifier {
            write!(f, "{modifier} ")?;
        }
        write!(f, "{} {}", self.left, self.operator)?;
        if !self.options.is_empty() {
            write!(f, "[")?;
            for option in &self.options {
                write!(f, "{}", option.code())?;
            }
            write!(f, "]")?;
        }
        write!(f, " {}", self.right)
    }
}
