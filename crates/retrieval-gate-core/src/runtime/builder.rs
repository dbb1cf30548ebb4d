// crates/retrieval-gate-core/src/runtime/builder.rs
// ============================================================================
// Module: Retrieval Gate Filter Builder
// Description: Folds the axis registry into a query-time filter expression.
// Purpose: Restrict search results before they leave the index.
// Dependencies: time, tracing, crate::core, crate::runtime::axes
// ============================================================================

//! ## Overview
//! The builder is a pure function of the user, the instant and static
//! settings. Under default-deny every applicable clause must match; under
//! default-allow any single clause is sufficient, mirroring the decision
//! mode of the evaluator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use time::OffsetDateTime;

use crate::core::config::AccessPolicyConfig;
use crate::core::config::DecisionMode;
use crate::core::filter::FilterExpression;
use crate::core::permission::UserPermission;
use crate::runtime::axes::AxisContext;
use crate::runtime::axes::PolicyAxisRegistry;

// ============================================================================
// SECTION: Filter Builder
// ============================================================================

/// Produces query-time filter expressions.
#[derive(Debug, Clone)]
pub struct PolicyFilterBuilder {
    /// Static policy settings.
    config: AccessPolicyConfig,
    /// Shared axis registry.
    registry: Arc<PolicyAxisRegistry>,
}

impl PolicyFilterBuilder {
    /// Creates a builder over the given settings and registry.
    #[must_use]
    pub const fn new(config: AccessPolicyConfig, registry: Arc<PolicyAxisRegistry>) -> Self {
        Self {
            config,
            registry,
        }
    }

    /// Returns the settings the builder was created with.
    #[must_use]
    pub const fn config(&self) -> &AccessPolicyConfig {
        &self.config
    }

    /// Builds the filter restricting a search to documents `user` may read at `now`.
    #[must_use]
    pub fn generate_filter(&self, user: &UserPermission, now: OffsetDateTime) -> FilterExpression {
        if !self.config.enabled || self.config.bypasses(user.is_admin()) {
            return FilterExpression::MatchAll;
        }
        let context = AxisContext::from_config(&self.config, now);
        let clauses: Vec<FilterExpression> = self
            .registry
            .applicable(user)
            .map(|axis| axis.query_clause(user, &context))
            .collect();
        let filter = match self.config.decision_mode() {
            DecisionMode::AllAxes => FilterExpression::and(clauses),
            DecisionMode::AnyAxis => FilterExpression::or(clauses),
        };
        tracing::trace!(user_id = %user.user_id, leaves = filter.leaf_count(), "filter generated");
        filter
    }
}
