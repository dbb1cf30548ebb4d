// crates/retrieval-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Retrieval Gate Runtime
// Description: Axis registry, filter builder, evaluator, cache and engine.
// Purpose: Turn user permissions into filters and access decisions.
// Dependencies: crate::{core, interfaces}, rayon, tracing
// ============================================================================

//! ## Overview
//! Runtime modules fold the shared axis registry into the two decision
//! paths. Both paths must go through [`PolicyAxisRegistry`] so they cannot
//! diverge.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod axes;
pub mod builder;
pub mod cache;
pub mod engine;
pub mod evaluator;
pub mod time_window;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditRecorder;
pub use axes::AxisContext;
pub use axes::DataClassificationAxis;
pub use axes::DepartmentAxis;
pub use axes::GeographicAxis;
pub use axes::IdentityAxis;
pub use axes::OrganizationAxis;
pub use axes::PolicyAxis;
pub use axes::PolicyAxisRegistry;
pub use axes::ProjectAxis;
pub use axes::RoleLevelAxis;
pub use axes::TagAxis;
pub use axes::TimeWindowAxis;
pub use builder::PolicyFilterBuilder;
pub use cache::DEFAULT_CACHE_ENTRIES;
pub use cache::PolicyCache;
pub use cache::PolicyPlan;
pub use engine::AccessControlEngine;
pub use engine::BatchMode;
pub use engine::EngineStatistics;
pub use evaluator::DocumentAccessEvaluator;
pub use evaluator::REASON_ADMIN_BYPASS;
pub use evaluator::REASON_DISABLED;
pub use evaluator::REASON_GRANTED;
pub use time_window::LocalClock;
pub use time_window::TimeWindowEvaluator;
