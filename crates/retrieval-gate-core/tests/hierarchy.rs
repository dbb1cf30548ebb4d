// crates/retrieval-gate-core/tests/hierarchy.rs
// ============================================================================
// Module: Hierarchy Resolver Tests
// Description: Role and classification hierarchy expansion.
// ============================================================================
//! ## Overview
//! Hierarchies are reflexive, ordered, and resolve unknown labels to the most
//! restrictive set.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use retrieval_gate_core::ClassificationHierarchy;
use retrieval_gate_core::ClassificationLevel;
use retrieval_gate_core::RoleHierarchy;
use retrieval_gate_core::RoleLevel;
use retrieval_gate_core::UserPermission;
use serde_json::json;

proptest! {
    #[test]
    fn role_hierarchy_is_reflexive(index in 0_usize..4) {
        let role = RoleLevel::ALL[index];
        prop_assert!(RoleHierarchy::resolve(role).contains(&role));
    }

    #[test]
    fn classification_hierarchy_is_reflexive(index in 0_usize..4) {
        let level = ClassificationLevel::ALL[index];
        prop_assert!(ClassificationHierarchy::resolve(level).contains(&level));
    }

    #[test]
    fn role_hierarchy_includes_every_lower_role(index in 0_usize..4) {
        let role = RoleLevel::ALL[index];
        prop_assert_eq!(RoleHierarchy::resolve(role), &RoleLevel::ALL[index..]);
    }
}

#[test]
fn admin_resolves_to_every_role_in_order() {
    assert_eq!(
        RoleHierarchy::resolve(RoleLevel::Admin),
        &[RoleLevel::Admin, RoleLevel::Manager, RoleLevel::User, RoleLevel::Guest]
    );
}

#[test]
fn internal_clearance_reads_internal_and_public() {
    assert_eq!(
        ClassificationHierarchy::resolve(ClassificationLevel::Internal),
        &[ClassificationLevel::Internal, ClassificationLevel::Public]
    );
}

#[test]
fn unknown_labels_resolve_to_most_restrictive_set() {
    assert_eq!(RoleHierarchy::resolve_label("superuser"), &[RoleLevel::Guest]);
    assert_eq!(RoleHierarchy::resolve_label(""), &[RoleLevel::Guest]);
    assert_eq!(
        ClassificationHierarchy::resolve_label("top-secret"),
        &[ClassificationLevel::Public]
    );
}

#[test]
fn known_labels_resolve_like_levels() {
    assert_eq!(RoleHierarchy::resolve_label("manager"), RoleHierarchy::resolve(RoleLevel::Manager));
    assert_eq!(
        ClassificationHierarchy::resolve_label("confidential"),
        ClassificationHierarchy::resolve(ClassificationLevel::Confidential)
    );
}

#[test]
fn unknown_user_levels_deserialize_to_most_restrictive() {
    let user: UserPermission = serde_json::from_value(json!({
        "userId": "u-9",
        "organization": "acme",
        "roleLevel": "superuser",
        "dataClassificationLevel": "cosmic"
    }))
    .unwrap();
    assert_eq!(user.role_level, RoleLevel::Guest);
    assert_eq!(user.data_classification_level, ClassificationLevel::Public);
    assert!(user.accessible_tags.is_empty());
    assert_eq!(user.geographic_restrictions, None);
}
