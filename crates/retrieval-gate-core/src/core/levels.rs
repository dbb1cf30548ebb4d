// crates/retrieval-gate-core/src/core/levels.rs
// ============================================================================
// Module: Retrieval Gate Privilege Levels
// Description: Role and data-classification level enums.
// Purpose: Give the two ordered privilege scales stable labels and fail-closed parsing.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Users carry a role level and a clearance level. Both serialize as lowercase
//! labels. Unrecognized labels never fail to parse: they collapse to the most
//! restrictive value of their scale (`guest` / `public`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Role Level
// ============================================================================

/// Organizational role level of a user, or the minimum role a document requires.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RoleLevel {
    /// Full administrative privileges.
    Admin,
    /// Managerial privileges.
    Manager,
    /// Regular member.
    User,
    /// Least privileged role.
    #[default]
    Guest,
}

impl RoleLevel {
    /// All role levels from most to least privileged.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Manager, Self::User, Self::Guest];

    /// Returns the stable label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
            Self::Guest => "guest",
        }
    }

    /// Parses a label, returning `None` when it is not a known role.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == label)
    }

    /// Parses a label, collapsing unknown values to [`RoleLevel::Guest`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or(Self::Guest)
    }
}

impl fmt::Display for RoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RoleLevel {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<&str> for RoleLevel {
    fn from(value: &str) -> Self {
        Self::from_label(value)
    }
}

// ============================================================================
// SECTION: Classification Level
// ============================================================================

/// Data-classification label, used both as a user's clearance and a document's label.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ClassificationLevel {
    /// Highest sensitivity.
    Restricted,
    /// Confidential business data.
    Confidential,
    /// Internal-only data.
    Internal,
    /// Publicly shareable data.
    #[default]
    Public,
}

impl ClassificationLevel {
    /// All classifications from most to least sensitive.
    pub const ALL: [Self; 4] = [Self::Restricted, Self::Confidential, Self::Internal, Self::Public];

    /// Returns the stable label for the classification.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restricted => "restricted",
            Self::Confidential => "confidential",
            Self::Internal => "internal",
            Self::Public => "public",
        }
    }

    /// Parses a label, returning `None` when it is not a known classification.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == label)
    }

    /// Parses a label, collapsing unknown values to [`ClassificationLevel::Public`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or(Self::Public)
    }
}

impl fmt::Display for ClassificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ClassificationLevel {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<&str> for ClassificationLevel {
    fn from(value: &str) -> Self {
        Self::from_label(value)
    }
}
