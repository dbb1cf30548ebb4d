// crates/retrieval-gate-core/src/runtime/audit.rs
// ============================================================================
// Module: Retrieval Gate Audit Recorder
// Description: Constructs audit records for access decisions.
// Purpose: Produce exactly one audit record per evaluated document.
// Dependencies: time, crate::core::decision
// ============================================================================

//! ## Overview
//! Recording is a pure constructor. Publishing records to an external sink is
//! handled by [`crate::interfaces::AuditSink`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;

use crate::core::decision::AuditAction;
use crate::core::decision::AuditRecord;
use crate::core::decision::AuditResult;

// ============================================================================
// SECTION: Recorder
// ============================================================================

/// Builds [`AuditRecord`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditRecorder;

impl AuditRecorder {
    /// Builds the audit record for one document access decision.
    #[must_use]
    pub fn record(
        timestamp: OffsetDateTime,
        user_id: &str,
        resource: &str,
        result: AuditResult,
    ) -> AuditRecord {
        AuditRecord {
            timestamp,
            user_id: user_id.to_string(),
            action: AuditAction::DocumentAccess,
            resource: resource.to_string(),
            result,
        }
    }
}
