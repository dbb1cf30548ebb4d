// crates/retrieval-gate-core/src/core/source.rs
// ============================================================================
// Module: Retrieval Gate Source Field Access
// Description: Search-index field semantics over raw JSON source objects.
// Purpose: Share one reading of raw fields between normalization and filter simulation.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Search indexes store documents as loosely typed JSON. These helpers pin
//! down how a raw field is read: dotted paths descend into objects, a scalar
//! behaves like a one-element array, `null` elements are ignored and an empty
//! array is indistinguishable from an absent field. Non-string scalars are
//! read as their JSON text, the way a keyword index stores them: `5` and
//! `"5"` are the same label.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde_json::Value;

// ============================================================================
// SECTION: Field Lookup
// ============================================================================

/// Resolves a dotted field path inside a source object.
#[must_use]
pub fn lookup<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(source, |current, segment| current.as_object()?.get(segment))
}

/// Returns the non-null values of a field, flattening one array level.
#[must_use]
pub fn field_values(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter(|item| !item.is_null()).collect(),
        Some(other) => vec![other],
    }
}

/// Returns true when a field is absent, null, or holds no non-null values.
#[must_use]
pub fn is_missing(value: Option<&Value>) -> bool {
    field_values(value).is_empty()
}

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Reads a scalar as a label: strings verbatim, other values as JSON text.
#[must_use]
pub fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads a field as a set of labels.
#[must_use]
pub fn label_set(value: Option<&Value>) -> BTreeSet<String> {
    field_values(value).into_iter().filter_map(label_of).collect()
}

/// Reads a single-valued label field, taking the first value when an array is stored.
#[must_use]
pub fn first_label(value: Option<&Value>) -> Option<String> {
    field_values(value).into_iter().find_map(label_of)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
