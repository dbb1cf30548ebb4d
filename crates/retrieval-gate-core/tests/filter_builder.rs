// crates/retrieval-gate-core/tests/filter_builder.rs
// ============================================================================
// Module: Filter Builder Tests
// Description: Query-time filter shape, short-circuits and terms limit.
// ============================================================================
//! ## Overview
//! Validates the filter tree produced for each decision mode and its
//! behavior under the reference index simulation.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;

use retrieval_gate_core::AccessControlEngine;
use retrieval_gate_core::AccessPolicyConfig;
use retrieval_gate_core::FilterExpression;
use retrieval_gate_core::PolicyAxisRegistry;
use retrieval_gate_core::PolicyFilterBuilder;
use retrieval_gate_core::UserPermission;
use serde_json::json;

use crate::common::FUTURE;
use crate::common::NOW;
use crate::common::NOW_HOUR;
use crate::common::PAST;
use crate::common::acme_admin;
use crate::common::acme_user;
use crate::common::default_allow;
use crate::common::default_deny;
use crate::common::open_source;
use crate::common::record;
use crate::common::with_field;

fn generate(config: AccessPolicyConfig, user: &UserPermission) -> FilterExpression {
    PolicyFilterBuilder::new(config, Arc::new(PolicyAxisRegistry::standard()))
        .generate_filter(user, NOW)
}

fn children(filter: &FilterExpression) -> Vec<FilterExpression> {
    match filter {
        FilterExpression::And(children) | FilterExpression::Or(children) => {
            children.iter().map(|child| child.as_ref().clone()).collect()
        }
        other => panic!("expected a group, got {other:?}"),
    }
}

#[test]
fn default_deny_conjoins_eight_clauses() {
    let filter = generate(default_deny(), &acme_user());
    assert!(matches!(filter, FilterExpression::And(_)));
    assert_eq!(children(&filter).len(), 8);
}

#[test]
fn scoped_department_adds_a_clause() {
    let filter = generate(default_deny(), &acme_user().with_department("eng"));
    let clauses = children(&filter);
    assert_eq!(clauses.len(), 9);
    assert_eq!(
        clauses[2],
        FilterExpression::terms("allowed_departments", ["eng", "public", "all"])
    );
}

#[test]
fn default_allow_disjoins_clauses() {
    let filter = generate(default_allow(), &acme_user());
    assert!(matches!(filter, FilterExpression::Or(_)));
    assert_eq!(children(&filter).len(), 8);
}

#[test]
fn identity_clause_lists_user_and_open_grants() {
    let clauses = children(&generate(default_deny(), &acme_user()));
    assert_eq!(clauses[0], FilterExpression::terms("user_permissions", ["u-1", "public", "all"]));
    assert_eq!(
        serde_json::to_value(&clauses[0]).unwrap(),
        json!({"terms": {"field": "user_permissions", "values": ["u-1", "public", "all"]}})
    );
}

#[test]
fn role_clause_accepts_resolved_labels_or_missing() {
    let clauses = children(&generate(default_deny(), &acme_user()));
    assert_eq!(
        clauses[2],
        FilterExpression::terms_or_missing("required_role_level", ["user", "guest"])
    );
}

#[test]
fn unrestricted_user_geography_matches_everything() {
    let clauses = children(&generate(default_deny(), &acme_user()));
    assert!(clauses[6].is_match_all());
    let clauses = children(&generate(default_deny(), &acme_user().with_regions(["eu"])));
    assert_eq!(
        clauses[6],
        FilterExpression::terms_or_missing("geographic_restrictions", ["eu"])
    );
}

#[test]
fn disabled_or_bypassed_filters_match_everything() {
    let disabled = AccessPolicyConfig {
        enabled: false,
        ..AccessPolicyConfig::default()
    };
    assert!(generate(disabled, &acme_user()).is_match_all());

    let bypass = AccessPolicyConfig {
        admin_bypass: true,
        ..AccessPolicyConfig::default()
    };
    assert!(generate(bypass.clone(), &acme_admin()).is_match_all());
    assert!(!generate(bypass, &acme_user()).is_match_all());
    assert!(!generate(default_deny(), &acme_admin()).is_match_all());
}

#[test]
fn oversized_terms_clause_matches_nothing() {
    let config = AccessPolicyConfig {
        max_filter_terms: 3,
        ..AccessPolicyConfig::default()
    };
    let user = acme_user().with_tags(["a", "b", "c", "d"]);
    let clauses = children(&generate(config, &user));
    assert_eq!(
        clauses[4],
        FilterExpression::or(vec![
            FilterExpression::terms("tags", Vec::<String>::new()),
            FilterExpression::missing("tags"),
        ])
    );
    let tagged = with_field(open_source("doc"), "tags", json!(["a"]));
    assert!(!clauses[4].matches(&tagged));
    assert!(clauses[4].matches(&open_source("doc")));
}

#[test]
fn filter_matches_open_documents_and_rejects_restricted_ones() {
    let filter = generate(default_deny(), &acme_user());
    assert!(filter.matches(&open_source("doc")));
    assert!(!filter.matches(&with_field(open_source("doc"), "tags", json!(["secret"]))));
    assert!(!filter.matches(&json!({})));
}

#[test]
fn time_clause_tracks_window_hours_and_days() {
    let filter = generate(default_deny(), &acme_user());
    let window = |restrictions| with_field(open_source("doc"), "time_restrictions", restrictions);
    assert!(filter.matches(&window(json!({"valid_from": PAST, "valid_until": FUTURE}))));
    assert!(!filter.matches(&window(json!({"valid_from": FUTURE}))));
    assert!(!filter.matches(&window(json!({"valid_until": PAST}))));
    assert!(filter.matches(&window(json!({"allowed_hours": [NOW_HOUR]}))));
    assert!(!filter.matches(&window(json!({"allowed_hours": [NOW_HOUR + 1]}))));
    assert!(filter.matches(&window(json!({"allowed_days": [3, 4]}))));
    assert!(!filter.matches(&window(json!({"allowed_days": [0]}))));
    assert!(filter.matches(&window(json!({"allowed_hours": []}))));
}

#[test]
fn re_validation_rejects_empty_hour_lists_the_filter_admits() {
    let engine = AccessControlEngine::new(default_deny());
    let source = with_field(open_source("doc"), "time_restrictions", json!({"allowed_days": []}));
    assert!(engine.generate_filter_at(&acme_user(), NOW).matches(&source));
    assert!(!engine.evaluate_one_at(&record(&source), &acme_user(), NOW).allowed);
}

#[test]
fn numeric_grants_read_as_their_text_in_both_paths() {
    let engine = AccessControlEngine::new(default_deny());
    let user = UserPermission::new("5", "acme");
    let source = with_field(open_source("doc"), "user_permissions", json!([5]));
    assert!(engine.generate_filter_at(&user, NOW).matches(&source));
    assert!(engine.evaluate_one_at(&record(&source), &user, NOW).allowed);

    let other = UserPermission::new("6", "acme");
    assert!(!engine.generate_filter_at(&other, NOW).matches(&source));
    assert!(!engine.evaluate_one_at(&record(&source), &other, NOW).allowed);
}

#[test]
fn generation_is_deterministic() {
    let user = acme_user().with_tags(["b", "a"]).with_projects(["p"]);
    assert_eq!(generate(default_deny(), &user), generate(default_deny(), &user));
}
