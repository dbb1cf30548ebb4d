// crates/retrieval-gate-core/src/core/decision.rs
// ============================================================================
// Module: Retrieval Gate Decisions
// Description: Access decisions, applied-rule labels and audit records.
// Purpose: Immutable result values produced once per (document, user) pair.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Every evaluated document yields exactly one [`AccessDecision`], and every
//! decision embeds exactly one [`AuditRecord`], whether access was granted or
//! denied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::document::DocumentRecord;

// ============================================================================
// SECTION: Applied Rules
// ============================================================================

/// Label recorded in [`AccessDecision::applied_rules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedRule {
    /// Checks were globally disabled.
    Disabled,
    /// The admin bypass short-circuited all checks.
    AdminBypass,
    /// Identity axis passed.
    UserDirect,
    /// Organization axis passed.
    Organization,
    /// Department axis passed.
    Department,
    /// Role-level axis passed.
    RoleLevel,
    /// Data-classification axis passed.
    DataClassification,
    /// Tag axis passed.
    Tags,
    /// Project axis passed.
    Projects,
    /// Geography axis passed.
    Geographic,
    /// Time-window axis passed.
    TimeRestrictions,
}

impl AppliedRule {
    /// Returns the stable label for the rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::AdminBypass => "admin_bypass",
            Self::UserDirect => "user_direct",
            Self::Organization => "organization",
            Self::Department => "department",
            Self::RoleLevel => "role_level",
            Self::DataClassification => "data_classification",
            Self::Tags => "tags",
            Self::Projects => "projects",
            Self::Geographic => "geographic",
            Self::TimeRestrictions => "time_restrictions",
        }
    }
}

impl fmt::Display for AppliedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Audit Records
// ============================================================================

/// Outcome stored in an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    /// Access granted.
    Allow,
    /// Access denied.
    Deny,
}

impl AuditResult {
    /// Maps a boolean decision to an audit result.
    #[must_use]
    pub const fn from_allowed(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }

    /// Returns the stable label for the result.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

/// Audited action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Read access to one retrieved document.
    DocumentAccess,
}

impl AuditAction {
    /// Returns the stable label for the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DocumentAccess => "document_access",
        }
    }
}

/// One audit entry per evaluated document.
///
/// # Invariants
/// - `resource` is the document id, or `unknown` when the document has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Evaluation instant.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// User the decision was made for.
    pub user_id: String,
    /// Audited action.
    pub action: AuditAction,
    /// Audited resource.
    pub resource: String,
    /// Decision outcome.
    pub result: AuditResult,
}

// ============================================================================
// SECTION: Access Decision
// ============================================================================

/// Decision for one (document, user) pair.
///
/// # Invariants
/// - `audit_info.result` agrees with `allowed`.
/// - `reason` is `Access granted` for grants and names every failed axis for denials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    /// Whether the document may be shown.
    pub allowed: bool,
    /// Human-readable explanation.
    pub reason: String,
    /// Rules that passed, in evaluation order.
    pub applied_rules: Vec<AppliedRule>,
    /// Audit entry emitted for this decision.
    pub audit_info: AuditRecord,
}

/// Result of re-validating a batch of documents.
///
/// # Invariants
/// - `audit` holds one decision per input document, in input order.
/// - `allowed` keeps the input order of granted documents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchEvaluation<D = DocumentRecord> {
    /// Documents that may be shown.
    pub allowed: Vec<D>,
    /// One decision per input document.
    pub audit: Vec<AccessDecision>,
}

impl<D> BatchEvaluation<D> {
    /// Number of denied documents.
    #[must_use]
    pub fn denied_count(&self) -> usize {
        self.audit.len().saturating_sub(self.allowed.len())
    }
}
