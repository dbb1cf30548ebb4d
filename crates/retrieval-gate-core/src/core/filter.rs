// crates/retrieval-gate-core/src/core/filter.rs
// ============================================================================
// Module: Retrieval Gate Filter Expression
// Description: Declarative boolean filter tree for query-time restriction.
// Purpose: Describe which documents a search may return, independent of query syntax.
// Dependencies: serde, serde_json, smallvec, time, crate::core::source
// ============================================================================

//! ## Overview
//! A [`FilterExpression`] is a small boolean algebra (`and`, `or`) over three
//! leaf kinds: `terms` (any-of membership), `missing` (field absent) and
//! `range` (timestamp bounds). Serialization into a concrete search-index
//! query language is left to a thin adapter outside this crate.
//!
//! [`FilterExpression::matches`] is a reference simulation of index semantics
//! over raw source objects. It exists so that query-time filtering can be
//! checked against result-time re-validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::source;

// ============================================================================
// SECTION: Term Values
// ============================================================================

/// Value inside a `terms` leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermValue {
    /// Keyword value.
    Text(String),
    /// Integer value.
    Integer(i64),
}

impl TermValue {
    /// Returns true when a stored field value equals this term.
    fn matches(&self, stored: &Value) -> bool {
        match self {
            Self::Text(text) => source::label_of(stored).as_deref() == Some(text.as_str()),
            Self::Integer(number) => stored.as_i64() == Some(*number),
        }
    }
}

impl From<&str> for TermValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TermValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for TermValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

// ============================================================================
// SECTION: Filter Expression
// ============================================================================

/// Boolean filter tree over named search-index fields.
///
/// # Invariants
/// - Empty `And` matches everything; empty `Or` matches nothing.
/// - A `Terms` leaf with no values matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterExpression {
    /// Always-true expression.
    MatchAll,
    /// All children must match.
    And(SmallVec<[Box<Self>; 4]>),
    /// At least one child must match.
    Or(SmallVec<[Box<Self>; 4]>),
    /// The field holds at least one of `values`.
    Terms {
        /// Dotted field path.
        field: String,
        /// Accepted values.
        values: Vec<TermValue>,
    },
    /// The field is absent, null or an empty array.
    Missing {
        /// Dotted field path.
        field: String,
    },
    /// The field holds an RFC 3339 timestamp within the bounds (inclusive).
    Range {
        /// Dotted field path.
        field: String,
        /// Inclusive lower bound.
        #[serde(default, with = "time::serde::rfc3339::option")]
        gte: Option<OffsetDateTime>,
        /// Inclusive upper bound.
        #[serde(default, with = "time::serde::rfc3339::option")]
        lte: Option<OffsetDateTime>,
    },
}

impl FilterExpression {
    /// Builds a conjunction.
    #[must_use]
    pub fn and(children: Vec<Self>) -> Self {
        Self::And(children.into_iter().map(Box::new).collect())
    }

    /// Builds a disjunction.
    #[must_use]
    pub fn or(children: Vec<Self>) -> Self {
        Self::Or(children.into_iter().map(Box::new).collect())
    }

    /// Builds a `terms` leaf.
    #[must_use]
    pub fn terms<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<TermValue>,
    {
        Self::Terms {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a `missing` leaf.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::Missing {
            field: field.to_string(),
        }
    }

    /// Builds a `range` leaf.
    #[must_use]
    pub fn range(field: &str, gte: Option<OffsetDateTime>, lte: Option<OffsetDateTime>) -> Self {
        Self::Range {
            field: field.to_string(),
            gte,
            lte,
        }
    }

    /// Matches when `field` holds one of `values` or is missing entirely.
    #[must_use]
    pub fn terms_or_missing<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<TermValue>,
    {
        Self::or(vec![Self::terms(field, values), Self::missing(field)])
    }

    /// Returns true for the always-true expression.
    #[must_use]
    pub const fn is_match_all(&self) -> bool {
        matches!(self, Self::MatchAll)
    }

    /// Counts the leaves of the tree (`MatchAll` counts as one).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                children.iter().map(|child| child.leaf_count()).sum()
            }
            Self::MatchAll | Self::Terms { .. } | Self::Missing { .. } | Self::Range { .. } => 1,
        }
    }

    /// Evaluates the expression against a raw source object using index semantics.
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Self::MatchAll => true,
            Self::And(children) => children.iter().all(|child| child.matches(document)),
            Self::Or(children) => children.iter().any(|child| child.matches(document)),
            Self::Terms {
                field,
                values,
            } => source::field_values(source::lookup(document, field))
                .into_iter()
                .any(|stored| values.iter().any(|value| value.matches(stored))),
            Self::Missing {
                field,
            } => source::is_missing(source::lookup(document, field)),
            Self::Range {
                field,
                gte,
                lte,
            } => {
                let Some(Value::String(raw)) = source::lookup(document, field) else {
                    return false;
                };
                let Ok(stored) = OffsetDateTime::parse(raw, &Rfc3339) else {
                    return false;
                };
                gte.is_none_or(|bound| stored >= bound) && lte.is_none_or(|bound| stored <= bound)
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
