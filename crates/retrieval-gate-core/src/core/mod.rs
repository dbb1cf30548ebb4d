// crates/retrieval-gate-core/src/core/mod.rs
// ============================================================================
// Module: Retrieval Gate Core Types
// Description: Data model shared by filter generation and re-validation.
// Purpose: Group levels, records, filter trees, decisions and settings.
// Dependencies: crate::core::*
// ============================================================================

//! ## Overview
//! Plain data types with no behavior beyond construction, normalization and
//! lookups. Decision logic lives in [`crate::runtime`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod decision;
pub mod document;
pub mod filter;
pub mod hashing;
pub mod hierarchy;
pub mod levels;
pub mod permission;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AccessPolicyConfig;
pub use config::DEFAULT_MAX_FILTER_TERMS;
pub use config::DecisionMode;
pub use decision::AccessDecision;
pub use decision::AppliedRule;
pub use decision::AuditAction;
pub use decision::AuditRecord;
pub use decision::AuditResult;
pub use decision::BatchEvaluation;
pub use document::DocumentRecord;
pub use document::GRANT_ALL;
pub use document::GRANT_PUBLIC;
pub use document::TimeRestrictions;
pub use document::WindowBound;
pub use document::fields;
pub use filter::FilterExpression;
pub use filter::TermValue;
pub use hashing::Fingerprint;
pub use hashing::HashError;
pub use hierarchy::ClassificationHierarchy;
pub use hierarchy::RoleHierarchy;
pub use levels::ClassificationLevel;
pub use levels::RoleLevel;
pub use permission::UserPermission;
