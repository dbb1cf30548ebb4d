// crates/retrieval-gate-core/src/core/hierarchy.rs
// ============================================================================
// Module: Retrieval Gate Privilege Hierarchies
// Description: Role and classification hierarchy resolvers.
// Purpose: Expand a level into the ordered set of levels it is privileged to satisfy.
// Dependencies: crate::core::levels
// ============================================================================

//! ## Overview
//! Both hierarchies are static, reflexive and total: every level resolves to a
//! non-empty slice that contains the level itself. Labels that are not
//! recognized resolve to the most restrictive set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::levels::ClassificationLevel;
use crate::core::levels::RoleLevel;

// ============================================================================
// SECTION: Role Hierarchy
// ============================================================================

/// Resolver for the role hierarchy `admin > manager > user > guest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleHierarchy;

impl RoleHierarchy {
    /// Returns the roles `role` may satisfy, most privileged first.
    #[must_use]
    pub const fn resolve(role: RoleLevel) -> &'static [RoleLevel] {
        match role {
            RoleLevel::Admin => &RoleLevel::ALL,
            RoleLevel::Manager => &[RoleLevel::Manager, RoleLevel::User, RoleLevel::Guest],
            RoleLevel::User => &[RoleLevel::User, RoleLevel::Guest],
            RoleLevel::Guest => &[RoleLevel::Guest],
        }
    }

    /// Resolves a raw role label; unknown labels resolve to `[guest]`.
    #[must_use]
    pub fn resolve_label(label: &str) -> &'static [RoleLevel] {
        Self::resolve(RoleLevel::from_label(label))
    }

    /// Returns true when `role` may satisfy a document requiring `required`.
    ///
    /// `required` is the raw document label so that unknown requirements never match.
    #[must_use]
    pub fn satisfies(role: RoleLevel, required: &str) -> bool {
        Self::resolve(role).iter().any(|candidate| candidate.as_str() == required)
    }
}

// ============================================================================
// SECTION: Classification Hierarchy
// ============================================================================

/// Resolver for the clearance hierarchy `restricted > confidential > internal > public`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationHierarchy;

impl ClassificationHierarchy {
    /// Returns the classifications `clearance` may read, most sensitive first.
    #[must_use]
    pub const fn resolve(clearance: ClassificationLevel) -> &'static [ClassificationLevel] {
        match clearance {
            ClassificationLevel::Restricted => &ClassificationLevel::ALL,
            ClassificationLevel::Confidential => &[
                ClassificationLevel::Confidential,
                ClassificationLevel::Internal,
                ClassificationLevel::Public,
            ],
            ClassificationLevel::Internal => {
                &[ClassificationLevel::Internal, ClassificationLevel::Public]
            }
            ClassificationLevel::Public => &[ClassificationLevel::Public],
        }
    }

    /// Resolves a raw clearance label; unknown labels resolve to `[public]`.
    #[must_use]
    pub fn resolve_label(label: &str) -> &'static [ClassificationLevel] {
        Self::resolve(ClassificationLevel::from_label(label))
    }

    /// Returns true when `clearance` may read a document labelled `classification`.
    #[must_use]
    pub fn permits(clearance: ClassificationLevel, classification: &str) -> bool {
        Self::resolve(clearance).iter().any(|candidate| candidate.as_str() == classification)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
