// crates/retrieval-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Retrieval Gate Interfaces
// Description: Boundary traits for external collaborators.
// Purpose: Publish audit records without owning their persistence or transport.
// Dependencies: tracing, crate::core::decision
// ============================================================================

//! ## Overview
//! The engine hands each [`AuditRecord`] to an [`AuditSink`]. Sinks must not
//! fail the decision path; transport errors stay inside the sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::core::decision::AuditRecord;

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Receiver for audit records.
pub trait AuditSink: Send + Sync {
    /// Records one audit entry.
    fn record(&self, record: &AuditRecord);
}

/// Sink that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _record: &AuditRecord) {}
}

/// Sink that emits one `info` event per record on target `retrieval_gate::audit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        tracing::info!(
            target: "retrieval_gate::audit",
            timestamp = %record.timestamp,
            user_id = %record.user_id,
            action = record.action.as_str(),
            resource = %record.resource,
            result = record.result.as_str(),
            "document access audited"
        );
    }
}

/// Sink that keeps records in memory.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    /// Records in arrival order.
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded entries.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.lock().clone()
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locks the record list, recovering it if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, Vec<AuditRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, record: &AuditRecord) {
        self.lock().push(record.clone());
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
