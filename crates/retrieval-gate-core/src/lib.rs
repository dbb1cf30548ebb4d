// crates/retrieval-gate-core/src/lib.rs
// ============================================================================
// Module: Retrieval Gate Core Library
// Description: Public API surface for the Retrieval Gate access-control engine.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Retrieval Gate decides, per document and per user, whether a search or
//! RAG retrieval result may be shown. Nine policy axes (identity,
//! organization, department, role, classification, tags, projects,
//! geography, time window) are defined once and drive two decision paths:
//! a query-time [`FilterExpression`] and result-time re-validation with an
//! audit record per document.
//!
//! The engine performs no network I/O and never fails on malformed input;
//! missing or unreadable evidence resolves toward denial.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AuditSink;
pub use interfaces::InMemoryAuditSink;
pub use interfaces::NoopAuditSink;
pub use interfaces::TracingAuditSink;
pub use runtime::AccessControlEngine;
pub use runtime::AuditRecorder;
pub use runtime::AxisContext;
pub use runtime::BatchMode;
pub use runtime::DocumentAccessEvaluator;
pub use runtime::EngineStatistics;
pub use runtime::PolicyAxis;
pub use runtime::PolicyAxisRegistry;
pub use runtime::PolicyCache;
pub use runtime::PolicyFilterBuilder;
pub use runtime::PolicyPlan;
pub use runtime::TimeWindowEvaluator;
