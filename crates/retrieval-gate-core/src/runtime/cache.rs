// crates/retrieval-gate-core/src/runtime/cache.rs
// ============================================================================
// Module: Retrieval Gate Policy Cache
// Description: Advisory cache of derived policy plans keyed by settings fingerprint.
// Purpose: Share derived axis metadata between engines with identical settings.
// Dependencies: serde, tracing, crate::core
// ============================================================================

//! ## Overview
//! The cache is an explicit handle owned by the caller and injected into an
//! engine as `Arc<PolicyCache>`, so tenants or requests can be isolated by
//! handing out separate caches. It is keyed by settings fingerprint, never by
//! user or document.
//!
//! # Invariants
//! - Clearing the cache never changes a decision or a filter.
//! - Capacity is bounded; inserting into a full cache evicts the smallest key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Serialize;

use crate::core::config::AccessPolicyConfig;
use crate::core::config::DecisionMode;
use crate::core::decision::AppliedRule;
use crate::core::hashing::Fingerprint;
use crate::runtime::axes::PolicyAxisRegistry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default capacity of a policy cache.
pub const DEFAULT_CACHE_ENTRIES: usize = 64;

// ============================================================================
// SECTION: Policy Plan
// ============================================================================

/// Axis metadata derived from settings and the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyPlan {
    /// Fingerprint of the settings the plan was derived from.
    pub fingerprint: Fingerprint,
    /// Active decision mode.
    pub mode: DecisionMode,
    /// Whether checks run at all.
    pub enabled: bool,
    /// Whether admins skip checks.
    pub admin_bypass: bool,
    /// Registered axes in evaluation order.
    pub axes: Vec<AppliedRule>,
}

impl PolicyPlan {
    /// Derives a plan from settings and a registry.
    #[must_use]
    pub fn derive(
        fingerprint: Fingerprint,
        config: &AccessPolicyConfig,
        registry: &PolicyAxisRegistry,
    ) -> Self {
        Self {
            fingerprint,
            mode: config.decision_mode(),
            enabled: config.enabled,
            admin_bypass: config.admin_bypass,
            axes: registry.ids(),
        }
    }
}

// ============================================================================
// SECTION: Cache
// ============================================================================

/// Bounded, thread-safe cache of policy plans.
#[derive(Debug)]
pub struct PolicyCache {
    /// Plans keyed by fingerprint.
    entries: Mutex<BTreeMap<Fingerprint, Arc<PolicyPlan>>>,
    /// Maximum number of entries.
    max_entries: usize,
}

impl PolicyCache {
    /// Creates a cache holding at most `max_entries` plans (minimum one).
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the cached plan for a fingerprint.
    #[must_use]
    pub fn get(&self, key: &Fingerprint) -> Option<Arc<PolicyPlan>> {
        let plan = self.lock().get(key).cloned();
        tracing::trace!(fingerprint = %key, hit = plan.is_some(), "policy cache lookup");
        plan
    }

    /// Stores a plan under its fingerprint.
    pub fn set(&self, plan: Arc<PolicyPlan>) {
        let mut entries = self.lock();
        if !entries.contains_key(&plan.fingerprint) && entries.len() >= self.max_entries {
            entries.pop_first();
        }
        entries.insert(plan.fingerprint.clone(), plan);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Returns the number of cached plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when the cache holds no plans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Locks the entries, recovering from a poisoned mutex.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<Fingerprint, Arc<PolicyPlan>>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for PolicyCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}
