// crates/retrieval-gate-core/src/core/permission.rs
// ============================================================================
// Module: Retrieval Gate User Permission
// Description: Authorization context of the user a retrieval is performed for.
// Purpose: Typed, immutable view of the caller-supplied permission profile.
// Dependencies: serde, crate::core::levels
// ============================================================================

//! ## Overview
//! A [`UserPermission`] is built per request by an authorization collaborator
//! and never persisted here. Missing collections deserialize as empty sets;
//! `geographic_restrictions` keeps the distinction between "absent" (no
//! restriction) and "present but empty".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::levels::ClassificationLevel;
use crate::core::levels::RoleLevel;

// ============================================================================
// SECTION: User Permission
// ============================================================================

/// Permission profile of the user a retrieval is evaluated for.
///
/// # Invariants
/// - Immutable for the duration of one evaluation.
/// - Unknown `role_level` / `data_classification_level` labels deserialize to
///   `guest` / `public`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermission {
    /// Stable user identifier.
    pub user_id: String,
    /// Organization the user belongs to.
    #[serde(default)]
    pub organization: String,
    /// Department, when the user is scoped to one.
    #[serde(default)]
    pub department: Option<String>,
    /// Role level of the user.
    #[serde(default)]
    pub role_level: RoleLevel,
    /// Clearance level of the user.
    #[serde(default)]
    pub data_classification_level: ClassificationLevel,
    /// Tags the user may read.
    #[serde(default)]
    pub accessible_tags: BTreeSet<String>,
    /// Projects the user is a member of.
    #[serde(default)]
    pub accessible_projects: BTreeSet<String>,
    /// Regions the user is located in; `None` imposes no geographic restriction.
    #[serde(default)]
    pub geographic_restrictions: Option<BTreeSet<String>>,
}

impl UserPermission {
    /// Creates a profile with the given identity and organization and no other grants.
    #[must_use]
    pub fn new(user_id: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            organization: organization.into(),
            ..Self::default()
        }
    }

    /// Returns the department when one is set and non-empty.
    #[must_use]
    pub fn scoped_department(&self) -> Option<&str> {
        self.department.as_deref().filter(|department| !department.is_empty())
    }

    /// Returns true when the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role_level == RoleLevel::Admin
    }

    /// Sets the department.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Sets the role level.
    #[must_use]
    pub const fn with_role(mut self, role: RoleLevel) -> Self {
        self.role_level = role;
        self
    }

    /// Sets the clearance level.
    #[must_use]
    pub const fn with_clearance(mut self, clearance: ClassificationLevel) -> Self {
        self.data_classification_level = clearance;
        self
    }

    /// Replaces the accessible tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accessible_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the accessible projects.
    #[must_use]
    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accessible_projects = projects.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the regions the user is located in.
    #[must_use]
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.geographic_restrictions = Some(regions.into_iter().map(Into::into).collect());
        self
    }
}
