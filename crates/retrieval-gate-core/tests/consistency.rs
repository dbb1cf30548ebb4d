// crates/retrieval-gate-core/tests/consistency.rs
// ============================================================================
// Module: Filter / Evaluator Consistency Tests
// Description: Query-time filters agree with result-time re-validation.
// Purpose: Guard the shared axis registry against divergence.
// ============================================================================
//! ## Overview
//! For random users, raw documents and settings, a document matches the
//! generated filter under the reference index simulation exactly when the
//! evaluator allows its normalized record.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use proptest::sample::select;
use proptest::sample::subsequence;
use retrieval_gate_core::AccessControlEngine;
use retrieval_gate_core::AccessPolicyConfig;
use retrieval_gate_core::ClassificationLevel;
use retrieval_gate_core::RoleLevel;
use retrieval_gate_core::UserPermission;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::common::FUTURE;
use crate::common::NOW;
use crate::common::PAST;
use crate::common::record;

/// Optional field holding a subset of `values`; `None` leaves the field absent.
fn label_field(values: &'static [&'static str]) -> impl Strategy<Value = Option<Value>> {
    option::of(subsequence(values.to_vec(), 0..=values.len()).prop_map(|labels| json!(labels)))
}

/// Optional single label drawn from `values`, sometimes stored as null.
fn single_label(values: &'static [&'static str]) -> impl Strategy<Value = Option<Value>> {
    option::of(prop_oneof![
        select(values.to_vec()).prop_map(|label| json!(label)),
        Just(Value::Null),
    ])
}

fn time_restrictions() -> impl Strategy<Value = Option<Value>> {
    let bound = || option::of(select(vec![PAST, FUTURE, "not-a-time"]).prop_map(|raw| json!(raw)));
    let numbers = |values: Vec<i64>| {
        option::of(subsequence(values.clone(), 1..=values.len()).prop_map(|items| json!(items)))
    };
    option::of(
        (bound(), bound(), numbers(vec![13, 14, 15]), numbers(vec![2, 3, 4]))
            .prop_map(|(from, until, hours, days)| {
                let mut object = Map::new();
                for (key, value) in [
                    ("valid_from", from),
                    ("valid_until", until),
                    ("allowed_hours", hours),
                    ("allowed_days", days),
                ] {
                    if let Some(value) = value {
                        object.insert(key.to_string(), value);
                    }
                }
                Value::Object(object)
            }),
    )
}

fn raw_document() -> impl Strategy<Value = Value> {
    (
        label_field(&["u-1", "u-2", "public", "all"]),
        label_field(&["acme", "globex", "public"]),
        label_field(&["eng", "ops", "all"]),
        single_label(&["admin", "manager", "user", "guest", "root"]),
        single_label(&["restricted", "confidential", "internal", "public", "secret"]),
        label_field(&["a", "b", "c"]),
        label_field(&["p1", "p2"]),
        label_field(&["us", "eu"]),
        time_restrictions(),
    )
        .prop_map(
            |(users, orgs, departments, role, classification, tags, projects, geo, time)| {
                let mut object = Map::new();
                for (key, value) in [
                    ("user_permissions", users),
                    ("allowed_organizations", orgs),
                    ("allowed_departments", departments),
                    ("required_role_level", role),
                    ("data_classification", classification),
                    ("tags", tags),
                    ("projects", projects),
                    ("geographic_restrictions", geo),
                    ("time_restrictions", time),
                ] {
                    if let Some(value) = value {
                        object.insert(key.to_string(), value);
                    }
                }
                Value::Object(object)
            },
        )
}

fn user() -> impl Strategy<Value = UserPermission> {
    (
        select(vec!["u-1", "u-2"]),
        select(vec!["acme", "globex"]),
        option::of(select(vec!["eng", "ops", ""])),
        select(RoleLevel::ALL.to_vec()),
        select(ClassificationLevel::ALL.to_vec()),
        subsequence(vec!["a", "b", "c"], 0..=3),
        subsequence(vec!["p1", "p2"], 0..=2),
        option::of(subsequence(vec!["us", "eu"], 0..=2)),
    )
        .prop_map(|(id, org, department, role, clearance, tags, projects, regions)| {
            let mut user = UserPermission::new(id, org)
                .with_role(role)
                .with_clearance(clearance)
                .with_tags(tags)
                .with_projects(projects);
            if let Some(department) = department {
                user = user.with_department(department);
            }
            if let Some(regions) = regions {
                user = user.with_regions(regions);
            }
            user
        })
}

fn settings() -> impl Strategy<Value = AccessPolicyConfig> {
    (any::<bool>(), any::<bool>(), any::<bool>(), -12_i32..=12).prop_map(
        |(enabled, admin_bypass, default_deny, offset_hours)| AccessPolicyConfig {
            enabled,
            admin_bypass,
            default_deny,
            utc_offset_seconds: offset_hours * 3_600,
            ..AccessPolicyConfig::default()
        },
    )
}

proptest! {
    #[test]
    fn filter_agrees_with_evaluator(
        source in raw_document(),
        user in user(),
        config in settings(),
    ) {
        let engine = AccessControlEngine::new(config);
        let filter = engine.generate_filter_at(&user, NOW);
        let decision = engine.evaluate_one_at(&record(&source), &user, NOW);
        prop_assert_eq!(
            filter.matches(&source),
            decision.allowed,
            "reason: {}",
            decision.reason
        );
    }

    #[test]
    fn batches_preserve_input_order(
        sources in vec(raw_document(), 0..40),
        user in user(),
        chunk_size in 1_usize..8,
    ) {
        let engine = AccessControlEngine::new(AccessPolicyConfig::default());
        let documents: Vec<_> = sources.iter().map(record).collect();
        let sequential = engine.evaluator().evaluate_batch(&documents, &user, NOW);
        let parallel =
            engine.evaluator().evaluate_batch_parallel(&documents, &user, NOW, chunk_size);
        prop_assert_eq!(sequential.audit.len(), documents.len());
        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn evaluation_is_idempotent(source in raw_document(), user in user(), config in settings()) {
        let engine = AccessControlEngine::new(config);
        let document = record(&source);
        let first = engine.evaluate_one_at(&document, &user, NOW);
        let second = engine.evaluate_one_at(&document, &user, NOW);
        prop_assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
    }
}
