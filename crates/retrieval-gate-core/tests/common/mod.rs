// crates/retrieval-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Shared fixtures for retrieval-gate-core integration tests.
// Purpose: Build users, raw documents and settings without repetition.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use retrieval_gate_core::AccessPolicyConfig;
use retrieval_gate_core::ClassificationLevel;
use retrieval_gate_core::DocumentRecord;
use retrieval_gate_core::RoleLevel;
use retrieval_gate_core::UserPermission;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;
use time::macros::datetime;

/// Fixed evaluation instant: Wednesday 2025-03-05, 14:30 UTC.
pub const NOW: OffsetDateTime = datetime!(2025-03-05 14:30 UTC);
/// Hour of day of [`NOW`] in UTC.
pub const NOW_HOUR: i64 = 14;
/// Weekday of [`NOW`] counted from Sunday.
pub const NOW_WEEKDAY: i64 = 3;
/// An instant before [`NOW`].
pub const PAST: &str = "2025-01-01T00:00:00Z";
/// An instant after [`NOW`].
pub const FUTURE: &str = "2026-01-01T00:00:00Z";

/// Settings with all-axes decisions.
pub fn default_deny() -> AccessPolicyConfig {
    AccessPolicyConfig::default()
}

/// Settings with any-axis decisions.
pub fn default_allow() -> AccessPolicyConfig {
    AccessPolicyConfig {
        default_deny: false,
        ..AccessPolicyConfig::default()
    }
}

/// A `user` / `internal` member of `acme` with no department.
pub fn acme_user() -> UserPermission {
    UserPermission::new("u-1", "acme")
        .with_role(RoleLevel::User)
        .with_clearance(ClassificationLevel::Internal)
}

/// An admin of `acme` with full clearance.
pub fn acme_admin() -> UserPermission {
    UserPermission::new("root", "acme")
        .with_role(RoleLevel::Admin)
        .with_clearance(ClassificationLevel::Restricted)
}

/// A raw source that passes every axis for [`acme_user`].
pub fn open_source(id: &str) -> Value {
    json!({
        "document_id": id,
        "user_permissions": ["public"],
        "allowed_organizations": ["acme"],
        "required_role_level": "guest",
        "data_classification": "public",
        "tags": [],
        "projects": [],
        "geographic_restrictions": []
    })
}

/// Sets one field of a raw source.
pub fn with_field(mut source: Value, field: &str, value: Value) -> Value {
    if let Some(object) = source.as_object_mut() {
        object.insert(field.to_string(), value);
    }
    source
}

/// Normalizes a raw source.
pub fn record(source: &Value) -> DocumentRecord {
    DocumentRecord::from_source(source)
}
