// crates/retrieval-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Retrieval Gate Engine
// Description: Facade wiring settings, axis registry, cache and audit sink.
// Purpose: Single entry point for filter generation and result re-validation.
// Dependencies: serde, serde_json, time, tracing, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`AccessControlEngine`] owns one [`PolicyFilterBuilder`] and one
//! [`DocumentAccessEvaluator`] over a shared [`PolicyAxisRegistry`], so both
//! decision paths always fold the same axes. Every method has an `_at`
//! variant taking the evaluation instant explicitly; the plain variants read
//! the system clock.
//!
//! # Invariants
//! - When `audit_logging` is enabled, the sink receives exactly one record per
//!   evaluated document, in input order.
//! - The optional cache only affects [`AccessControlEngine::policy_plan`];
//!   statistics read it without filling it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::core::config::AccessPolicyConfig;
use crate::core::decision::AccessDecision;
use crate::core::decision::BatchEvaluation;
use crate::core::document::DocumentRecord;
use crate::core::filter::FilterExpression;
use crate::core::hashing;
use crate::core::hashing::Fingerprint;
use crate::core::permission::UserPermission;
use crate::interfaces::AuditSink;
use crate::interfaces::NoopAuditSink;
use crate::runtime::axes::PolicyAxisRegistry;
use crate::runtime::builder::PolicyFilterBuilder;
use crate::runtime::cache::PolicyCache;
use crate::runtime::cache::PolicyPlan;
use crate::runtime::evaluator::DocumentAccessEvaluator;

// ============================================================================
// SECTION: Batch Mode
// ============================================================================

/// How the engine evaluates batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// Evaluate documents one after another.
    #[default]
    Sequential,
    /// Evaluate documents on the rayon pool.
    Parallel {
        /// Documents per work unit.
        chunk_size: usize,
    },
}

impl BatchMode {
    /// Returns the chunk size for parallel evaluation.
    const fn chunk_size(self) -> Option<usize> {
        match self {
            Self::Sequential => None,
            Self::Parallel {
                chunk_size,
            } => Some(chunk_size),
        }
    }
}

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Read-only diagnostic snapshot of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatistics {
    /// Number of cached policy plans; zero without a cache.
    pub cache_size: usize,
    /// Active settings.
    pub config: AccessPolicyConfig,
    /// Settings fingerprint, when it could be computed.
    pub fingerprint: Option<Fingerprint>,
    /// Derived policy plan, when a fingerprint is available.
    pub plan: Option<PolicyPlan>,
    /// Batch evaluation mode.
    pub batch_mode: BatchMode,
    /// Snapshot instant.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Permission-aware access-control engine.
pub struct AccessControlEngine {
    /// Query-time filter builder.
    builder: PolicyFilterBuilder,
    /// Result-time evaluator.
    evaluator: DocumentAccessEvaluator,
    /// Axis registry shared by the builder and the evaluator.
    registry: Arc<PolicyAxisRegistry>,
    /// Fingerprint of the settings.
    fingerprint: Option<Fingerprint>,
    /// Advisory plan cache.
    cache: Option<Arc<PolicyCache>>,
    /// Audit record receiver.
    sink: Arc<dyn AuditSink>,
    /// Batch evaluation mode.
    batch_mode: BatchMode,
}

impl AccessControlEngine {
    /// Creates an engine with the standard axes, no cache and a no-op audit sink.
    #[must_use]
    pub fn new(config: AccessPolicyConfig) -> Self {
        let fingerprint = match hashing::fingerprint(&config) {
            Ok(fingerprint) => Some(fingerprint),
            Err(err) => {
                tracing::warn!(error = %err, "settings fingerprint unavailable; cache disabled");
                None
            }
        };
        let registry = Arc::new(PolicyAxisRegistry::standard());
        Self {
            builder: PolicyFilterBuilder::new(config.clone(), Arc::clone(&registry)),
            evaluator: DocumentAccessEvaluator::new(config, Arc::clone(&registry)),
            registry,
            fingerprint,
            cache: None,
            sink: Arc::new(NoopAuditSink),
            batch_mode: BatchMode::Sequential,
        }
    }

    /// Attaches an advisory plan cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<PolicyCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Selects the batch evaluation mode.
    #[must_use]
    pub const fn with_batch_mode(mut self, batch_mode: BatchMode) -> Self {
        self.batch_mode = batch_mode;
        self
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn config(&self) -> &AccessPolicyConfig {
        self.evaluator.config()
    }

    /// Returns the filter builder.
    #[must_use]
    pub const fn builder(&self) -> &PolicyFilterBuilder {
        &self.builder
    }

    /// Returns the document evaluator.
    #[must_use]
    pub const fn evaluator(&self) -> &DocumentAccessEvaluator {
        &self.evaluator
    }

    /// Builds the query-time filter for `user` at the current instant.
    #[must_use]
    pub fn generate_filter(&self, user: &UserPermission) -> FilterExpression {
        self.generate_filter_at(user, OffsetDateTime::now_utc())
    }

    /// Builds the query-time filter for `user` at `now`.
    #[must_use]
    pub fn generate_filter_at(
        &self,
        user: &UserPermission,
        now: OffsetDateTime,
    ) -> FilterExpression {
        self.builder.generate_filter(user, now)
    }

    /// Evaluates one document at the current instant.
    pub fn evaluate_one(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
    ) -> AccessDecision {
        self.evaluate_one_at(document, user, OffsetDateTime::now_utc())
    }

    /// Evaluates one document at `now` and publishes its audit record.
    pub fn evaluate_one_at(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        now: OffsetDateTime,
    ) -> AccessDecision {
        let decision = self.evaluator.evaluate_one(document, user, now);
        self.publish(std::slice::from_ref(&decision));
        decision
    }

    /// Evaluates a batch at the current instant.
    pub fn evaluate_batch(
        &self,
        documents: &[DocumentRecord],
        user: &UserPermission,
    ) -> BatchEvaluation {
        self.evaluate_batch_at(documents, user, OffsetDateTime::now_utc())
    }

    /// Evaluates a batch at `now` using the configured batch mode.
    pub fn evaluate_batch_at(
        &self,
        documents: &[DocumentRecord],
        user: &UserPermission,
        now: OffsetDateTime,
    ) -> BatchEvaluation {
        let batch = match self.batch_mode.chunk_size() {
            Some(chunk_size) => {
                self.evaluator.evaluate_batch_parallel(documents, user, now, chunk_size)
            }
            None => self.evaluator.evaluate_batch(documents, user, now),
        };
        self.publish(&batch.audit);
        batch
    }

    /// Re-validates raw search hits at `now`, returning surviving hits unchanged.
    pub fn filter_search_hits(
        &self,
        hits: Vec<Value>,
        user: &UserPermission,
        now: OffsetDateTime,
    ) -> BatchEvaluation<Value> {
        let batch = self.evaluator.evaluate_hits(hits, user, now, self.batch_mode.chunk_size());
        self.publish(&batch.audit);
        batch
    }

    /// Returns the derived policy plan, consulting the cache when attached.
    #[must_use]
    pub fn policy_plan(&self) -> Option<Arc<PolicyPlan>> {
        let fingerprint = self.fingerprint.as_ref()?;
        if let Some(plan) = self.cache.as_ref().and_then(|cache| cache.get(fingerprint)) {
            return Some(plan);
        }
        let plan = Arc::new(self.derive_plan(fingerprint));
        if let Some(cache) = &self.cache {
            cache.set(Arc::clone(&plan));
        }
        Some(plan)
    }

    /// Returns diagnostics at the current instant.
    #[must_use]
    pub fn statistics(&self) -> EngineStatistics {
        self.statistics_at(OffsetDateTime::now_utc())
    }

    /// Returns diagnostics stamped with `now`. Never writes to the cache.
    #[must_use]
    pub fn statistics_at(&self, now: OffsetDateTime) -> EngineStatistics {
        let plan = self.fingerprint.as_ref().map(|fingerprint| {
            self.cache
                .as_ref()
                .and_then(|cache| cache.get(fingerprint))
                .map_or_else(|| self.derive_plan(fingerprint), |plan| plan.as_ref().clone())
        });
        EngineStatistics {
            cache_size: self.cache.as_ref().map_or(0, |cache| cache.len()),
            config: self.config().clone(),
            fingerprint: self.fingerprint.clone(),
            plan,
            batch_mode: self.batch_mode,
            timestamp: now,
        }
    }

    /// Clears the attached cache, if any.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Derives the policy plan for the active settings.
    fn derive_plan(&self, fingerprint: &Fingerprint) -> PolicyPlan {
        PolicyPlan::derive(fingerprint.clone(), self.config(), &self.registry)
    }

    /// Publishes audit records when audit logging is enabled.
    fn publish(&self, decisions: &[AccessDecision]) {
        if !self.config().audit_logging {
            return;
        }
        for decision in decisions {
            self.sink.record(&decision.audit_info);
        }
    }
}

impl std::fmt::Debug for AccessControlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControlEngine")
            .field("config", self.config())
            .field("fingerprint", &self.fingerprint)
            .field("batch_mode", &self.batch_mode)
            .finish_non_exhaustive()
    }
}
