// crates/retrieval-gate-core/src/core/config.rs
// ============================================================================
// Module: Retrieval Gate Policy Settings
// Description: Engine-level switches consumed by filter generation and evaluation.
// Purpose: Hold the static settings both decision paths share.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! [`AccessPolicyConfig`] is the in-memory settings value the engine trusts
//! as-is. Loading and validating it from disk is the job of the config crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::UtcOffset;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum number of values in a single `terms` leaf.
pub const DEFAULT_MAX_FILTER_TERMS: usize = 1_000;

// ============================================================================
// SECTION: Decision Mode
// ============================================================================

/// How passing axes combine into a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    /// Every applicable axis must pass.
    AllAxes,
    /// Any passing axis is sufficient.
    AnyAxis,
}

// ============================================================================
// SECTION: Policy Settings
// ============================================================================

/// Static policy settings.
///
/// # Invariants
/// - Values are trusted; no validation happens here.
#[allow(clippy::struct_excessive_bools, reason = "Settings mirror user-facing toggles.")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicyConfig {
    /// When false, every document is allowed and audited as `disabled`.
    pub enabled: bool,
    /// When true, admins skip all axis checks.
    pub admin_bypass: bool,
    /// Selects all-axes (true) or any-axis (false) decisions.
    pub default_deny: bool,
    /// Publish audit records to the configured sink.
    pub audit_logging: bool,
    /// Offset applied to `now` before reading hour of day and weekday.
    pub utc_offset_seconds: i32,
    /// Maximum number of values in one `terms` leaf.
    pub max_filter_terms: usize,
}

impl Default for AccessPolicyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_bypass: false,
            default_deny: true,
            audit_logging: true,
            utc_offset_seconds: 0,
            max_filter_terms: DEFAULT_MAX_FILTER_TERMS,
        }
    }
}

impl AccessPolicyConfig {
    /// Returns the active decision mode.
    #[must_use]
    pub const fn decision_mode(&self) -> DecisionMode {
        if self.default_deny { DecisionMode::AllAxes } else { DecisionMode::AnyAxis }
    }

    /// Returns the local offset, falling back to UTC for out-of-range values.
    #[must_use]
    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_whole_seconds(self.utc_offset_seconds).unwrap_or(UtcOffset::UTC)
    }

    /// Returns true when an admin user skips axis checks.
    #[must_use]
    pub const fn bypasses(&self, is_admin: bool) -> bool {
        self.admin_bypass && is_admin
    }
}
