// crates/retrieval-gate-config/src/lib.rs
// ============================================================================
// Module: Retrieval Gate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for retrieval-gate.toml semantics.
// Dependencies: retrieval-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `retrieval-gate-config` defines the canonical configuration model for
//! Retrieval Gate. Loading is strict and fail-closed; a validated config is
//! converted into core policy settings and an engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
