// crates/retrieval-gate-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Retrieval Gate Document Evaluator
// Description: Result-time re-validation of retrieved documents.
// Purpose: Decide per document whether it may be shown and audit every decision.
// Dependencies: rayon, serde_json, time, tracing, crate::core, crate::runtime
// ============================================================================

//! ## Overview
//! Evaluation of one (document, user) pair runs a fixed state machine:
//! disabled and admin-bypass short-circuit to a grant, otherwise every
//! applicable axis is checked and the decision mode combines the outcomes.
//! Each path ends with exactly one audit record.
//!
//! Batches evaluate documents independently. The parallel variant preserves
//! input order in both the allowed list and the audit list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use rayon::prelude::*;
use serde_json::Value;
use time::OffsetDateTime;

use crate::core::config::AccessPolicyConfig;
use crate::core::config::DecisionMode;
use crate::core::decision::AccessDecision;
use crate::core::decision::AppliedRule;
use crate::core::decision::AuditResult;
use crate::core::decision::BatchEvaluation;
use crate::core::document::DocumentRecord;
use crate::core::permission::UserPermission;
use crate::runtime::audit::AuditRecorder;
use crate::runtime::axes::AxisContext;
use crate::runtime::axes::PolicyAxisRegistry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reason recorded for every grant reached by checking axes.
pub const REASON_GRANTED: &str = "Access granted";
/// Reason recorded when checks are globally disabled.
pub const REASON_DISABLED: &str = "Permission checking disabled";
/// Reason recorded when the admin bypass applies.
pub const REASON_ADMIN_BYPASS: &str = "Admin bypass";
/// Separator between denial reasons.
const REASON_SEPARATOR: &str = "; ";
/// Key holding the source object inside a raw search hit.
const HIT_SOURCE: &str = "_source";

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Re-validates retrieved documents against a user's permissions.
#[derive(Debug, Clone)]
pub struct DocumentAccessEvaluator {
    /// Static policy settings.
    config: AccessPolicyConfig,
    /// Shared axis registry.
    registry: Arc<PolicyAxisRegistry>,
}

impl DocumentAccessEvaluator {
    /// Creates an evaluator over the given settings and registry.
    #[must_use]
    pub const fn new(config: AccessPolicyConfig, registry: Arc<PolicyAxisRegistry>) -> Self {
        Self {
            config,
            registry,
        }
    }

    /// Returns the settings the evaluator was created with.
    #[must_use]
    pub const fn config(&self) -> &AccessPolicyConfig {
        &self.config
    }

    /// Decides whether `user` may read `document` at `now`.
    #[must_use]
    pub fn evaluate_one(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        now: OffsetDateTime,
    ) -> AccessDecision {
        if !self.config.enabled {
            return grant(document, user, now, AppliedRule::Disabled, REASON_DISABLED);
        }
        if self.config.bypasses(user.is_admin()) {
            return grant(document, user, now, AppliedRule::AdminBypass, REASON_ADMIN_BYPASS);
        }

        let context = AxisContext::from_config(&self.config, now);
        let mut applicable = 0_usize;
        let mut applied_rules = Vec::new();
        let mut reasons = Vec::new();
        for axis in self.registry.applicable(user) {
            applicable += 1;
            match axis.check(document, user, &context) {
                Ok(()) => applied_rules.push(axis.id()),
                Err(reason) => {
                    tracing::debug!(
                        user_id = %user.user_id,
                        resource = document.audit_resource(),
                        axis = axis.id().as_str(),
                        "axis not satisfied"
                    );
                    reasons.push(reason);
                }
            }
        }

        let allowed = match self.config.decision_mode() {
            DecisionMode::AllAxes => applied_rules.len() == applicable,
            DecisionMode::AnyAxis => !applied_rules.is_empty(),
        };
        let reason =
            if allowed { REASON_GRANTED.to_string() } else { reasons.join(REASON_SEPARATOR) };
        decide(document, user, now, allowed, reason, applied_rules)
    }

    /// Evaluates every document in order.
    #[must_use]
    pub fn evaluate_batch(
        &self,
        documents: &[DocumentRecord],
        user: &UserPermission,
        now: OffsetDateTime,
    ) -> BatchEvaluation {
        let audit: Vec<AccessDecision> =
            documents.iter().map(|document| self.evaluate_one(document, user, now)).collect();
        partition(documents.to_vec(), audit)
    }

    /// Evaluates documents on the rayon pool, `chunk_size` documents per work unit.
    ///
    /// Output order matches input order.
    #[must_use]
    pub fn evaluate_batch_parallel(
        &self,
        documents: &[DocumentRecord],
        user: &UserPermission,
        now: OffsetDateTime,
        chunk_size: usize,
    ) -> BatchEvaluation {
        let audit: Vec<AccessDecision> = documents
            .par_iter()
            .with_min_len(chunk_size.max(1))
            .map(|document| self.evaluate_one(document, user, now))
            .collect();
        partition(documents.to_vec(), audit)
    }

    /// Re-validates raw search hits, keeping surviving hits unchanged.
    ///
    /// Hits may wrap their source object in `_source` or be bare source objects.
    #[must_use]
    pub fn evaluate_hits(
        &self,
        hits: Vec<Value>,
        user: &UserPermission,
        now: OffsetDateTime,
        chunk_size: Option<usize>,
    ) -> BatchEvaluation<Value> {
        let evaluate = |hit: &Value| {
            self.evaluate_one(&DocumentRecord::from_source(hit_source(hit)), user, now)
        };
        let audit: Vec<AccessDecision> = match chunk_size {
            Some(chunk_size) => {
                hits.par_iter().with_min_len(chunk_size.max(1)).map(evaluate).collect()
            }
            None => hits.iter().map(evaluate).collect(),
        };
        partition(hits, audit)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the source object of a raw search hit.
fn hit_source(hit: &Value) -> &Value {
    hit.get(HIT_SOURCE).filter(|source| source.is_object()).unwrap_or(hit)
}

/// Builds a short-circuit grant.
fn grant(
    document: &DocumentRecord,
    user: &UserPermission,
    now: OffsetDateTime,
    rule: AppliedRule,
    reason: &str,
) -> AccessDecision {
    decide(document, user, now, true, reason.to_string(), vec![rule])
}

/// Builds a decision and its audit record.
fn decide(
    document: &DocumentRecord,
    user: &UserPermission,
    now: OffsetDateTime,
    allowed: bool,
    reason: String,
    applied_rules: Vec<AppliedRule>,
) -> AccessDecision {
    let result = AuditResult::from_allowed(allowed);
    tracing::debug!(
        user_id = %user.user_id,
        resource = document.audit_resource(),
        result = result.as_str(),
        "document access decided"
    );
    AccessDecision {
        allowed,
        reason,
        applied_rules,
        audit_info: AuditRecorder::record(now, &user.user_id, document.audit_resource(), result),
    }
}

/// Splits items into the allowed list using their decisions, preserving order.
fn partition<D>(items: Vec<D>, audit: Vec<AccessDecision>) -> BatchEvaluation<D> {
    let allowed = items
        .into_iter()
        .zip(&audit)
        .filter_map(|(item, decision)| decision.allowed.then_some(item))
        .collect();
    BatchEvaluation {
        allowed,
        audit,
    }
}
