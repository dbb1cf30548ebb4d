// crates/retrieval-gate-core/src/core/document.rs
// ============================================================================
// Module: Retrieval Gate Document Record
// Description: Access metadata attached to a retrieved document.
// Purpose: Typed, read-only view of search-index access fields with lenient normalization.
// Dependencies: serde, serde_json, time, crate::core::source
// ============================================================================

//! ## Overview
//! A [`DocumentRecord`] carries the access-control fields a search index
//! stores next to each chunk. Records can be deserialized directly when the
//! source is well formed, or built with [`DocumentRecord::from_source`], which
//! never fails and resolves every malformed field toward denial.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::levels::ClassificationLevel;
use crate::core::levels::RoleLevel;
use crate::core::source;

// ============================================================================
// SECTION: Field Names
// ============================================================================

/// Search-index field names shared by normalization and filter generation.
pub mod fields {
    /// Document identifier.
    pub const DOCUMENT_ID: &str = "document_id";
    /// Direct user grant list.
    pub const USER_PERMISSIONS: &str = "user_permissions";
    /// Allowed organizations.
    pub const ALLOWED_ORGANIZATIONS: &str = "allowed_organizations";
    /// Allowed departments.
    pub const ALLOWED_DEPARTMENTS: &str = "allowed_departments";
    /// Minimum role level.
    pub const REQUIRED_ROLE_LEVEL: &str = "required_role_level";
    /// Data classification label.
    pub const DATA_CLASSIFICATION: &str = "data_classification";
    /// Document tags.
    pub const TAGS: &str = "tags";
    /// Document projects.
    pub const PROJECTS: &str = "projects";
    /// Geographic restrictions.
    pub const GEOGRAPHIC_RESTRICTIONS: &str = "geographic_restrictions";
    /// Time restriction object.
    pub const TIME_RESTRICTIONS: &str = "time_restrictions";
    /// Start of the validity window.
    pub const VALID_FROM: &str = "time_restrictions.valid_from";
    /// End of the validity window.
    pub const VALID_UNTIL: &str = "time_restrictions.valid_until";
    /// Allowed hours of day.
    pub const ALLOWED_HOURS: &str = "time_restrictions.allowed_hours";
    /// Allowed days of week.
    pub const ALLOWED_DAYS: &str = "time_restrictions.allowed_days";
}

/// Grant label that opens an identity, organization or department axis to everyone.
pub const GRANT_PUBLIC: &str = "public";
/// Grant label equivalent to [`GRANT_PUBLIC`].
pub const GRANT_ALL: &str = "all";

// ============================================================================
// SECTION: Window Bounds
// ============================================================================

/// One end of a document validity window.
///
/// # Invariants
/// - `Unreadable` bounds are never satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WindowBound {
    /// A parsed RFC 3339 instant.
    At(OffsetDateTime),
    /// A stored value that could not be parsed.
    Unreadable(String),
}

impl WindowBound {
    /// Parses an RFC 3339 timestamp, keeping unreadable input.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        OffsetDateTime::parse(raw, &Rfc3339)
            .map_or_else(|_| Self::Unreadable(raw.to_string()), Self::At)
    }

    /// Returns the instant when the bound is readable.
    #[must_use]
    pub const fn instant(&self) -> Option<OffsetDateTime> {
        match self {
            Self::At(instant) => Some(*instant),
            Self::Unreadable(_) => None,
        }
    }
}

impl From<OffsetDateTime> for WindowBound {
    fn from(value: OffsetDateTime) -> Self {
        Self::At(value)
    }
}

impl From<String> for WindowBound {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<WindowBound> for String {
    fn from(value: WindowBound) -> Self {
        match value {
            WindowBound::At(instant) => {
                instant.format(&Rfc3339).unwrap_or_else(|_| instant.unix_timestamp().to_string())
            }
            WindowBound::Unreadable(raw) => raw,
        }
    }
}

// ============================================================================
// SECTION: Time Restrictions
// ============================================================================

/// Time window attached to a document.
///
/// Hours are `0..=23` and days are `0..=6` with `0` = Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRestrictions {
    /// Earliest instant the document may be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<WindowBound>,
    /// Latest instant the document may be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<WindowBound>,
    /// Local hours of day during which the document may be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_hours: Option<BTreeSet<u8>>,
    /// Local weekdays during which the document may be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_days: Option<BTreeSet<u8>>,
}

impl TimeRestrictions {
    /// Reads a raw `time_restrictions` value. Non-object values impose no restriction.
    fn from_source(raw: &Value) -> Self {
        Self {
            valid_from: read_bound(raw.get("valid_from")),
            valid_until: read_bound(raw.get("valid_until")),
            allowed_hours: read_small_ints(raw.get("allowed_hours")),
            allowed_days: read_small_ints(raw.get("allowed_days")),
        }
    }
}

/// Reads a window bound; absent, null and empty values impose no bound.
fn read_bound(value: Option<&Value>) -> Option<WindowBound> {
    if source::is_missing(value) {
        return None;
    }
    match value? {
        Value::String(raw) => Some(WindowBound::parse(raw)),
        other => Some(WindowBound::Unreadable(other.to_string())),
    }
}

/// Reads an hour/day list. Absent and null fields impose no restriction; a present
/// list keeps only its valid entries, so an empty list denies.
fn read_small_ints(value: Option<&Value>) -> Option<BTreeSet<u8>> {
    if matches!(value, None | Some(Value::Null)) {
        return None;
    }
    Some(
        source::field_values(value)
            .into_iter()
            .filter_map(Value::as_i64)
            .filter_map(|number| u8::try_from(number).ok())
            .collect(),
    )
}

// ============================================================================
// SECTION: Document Record
// ============================================================================

/// Access-control metadata of one retrieved document.
///
/// # Invariants
/// - Missing collections are empty sets.
/// - `required_role_level` and `data_classification` keep the raw label so
///   that unknown labels fail closed instead of collapsing to a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document identifier, when the index stores one.
    #[serde(default)]
    pub document_id: Option<String>,
    /// Direct grant list (user ids, `public` or `all`).
    #[serde(default)]
    pub user_permissions: BTreeSet<String>,
    /// Organizations allowed to read the document.
    #[serde(default)]
    pub allowed_organizations: BTreeSet<String>,
    /// Departments allowed to read the document.
    #[serde(default)]
    pub allowed_departments: BTreeSet<String>,
    /// Minimum role label required.
    #[serde(default = "default_required_role")]
    pub required_role_level: String,
    /// Classification label.
    #[serde(default = "default_classification")]
    pub data_classification: String,
    /// Tags; an empty set imposes no tag restriction.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Projects; an empty set imposes no project restriction.
    #[serde(default)]
    pub projects: BTreeSet<String>,
    /// Regions; an empty set imposes no geographic restriction.
    #[serde(default)]
    pub geographic_restrictions: BTreeSet<String>,
    /// Optional time window.
    #[serde(default)]
    pub time_restrictions: Option<TimeRestrictions>,
}

/// Default minimum role for documents that do not declare one.
fn default_required_role() -> String {
    RoleLevel::Guest.as_str().to_string()
}

/// Default classification for documents that do not declare one.
fn default_classification() -> String {
    ClassificationLevel::Public.as_str().to_string()
}

impl Default for DocumentRecord {
    fn default() -> Self {
        Self {
            document_id: None,
            user_permissions: BTreeSet::new(),
            allowed_organizations: BTreeSet::new(),
            allowed_departments: BTreeSet::new(),
            required_role_level: default_required_role(),
            data_classification: default_classification(),
            tags: BTreeSet::new(),
            projects: BTreeSet::new(),
            geographic_restrictions: BTreeSet::new(),
            time_restrictions: None,
        }
    }
}

impl DocumentRecord {
    /// Creates an empty record with the given identifier.
    #[must_use]
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: Some(document_id.into()),
            ..Self::default()
        }
    }

    /// Normalizes a raw search-index source object. Never fails.
    #[must_use]
    pub fn from_source(raw: &Value) -> Self {
        let field = |name: &str| source::lookup(raw, name);
        Self {
            document_id: source::first_label(field(fields::DOCUMENT_ID)),
            user_permissions: source::label_set(field(fields::USER_PERMISSIONS)),
            allowed_organizations: source::label_set(field(fields::ALLOWED_ORGANIZATIONS)),
            allowed_departments: source::label_set(field(fields::ALLOWED_DEPARTMENTS)),
            required_role_level: source::first_label(field(fields::REQUIRED_ROLE_LEVEL))
                .unwrap_or_else(default_required_role),
            data_classification: source::first_label(field(fields::DATA_CLASSIFICATION))
                .unwrap_or_else(default_classification),
            tags: source::label_set(field(fields::TAGS)),
            projects: source::label_set(field(fields::PROJECTS)),
            geographic_restrictions: source::label_set(field(fields::GEOGRAPHIC_RESTRICTIONS)),
            time_restrictions: match field(fields::TIME_RESTRICTIONS) {
                None | Some(Value::Null) => None,
                Some(raw) => Some(TimeRestrictions::from_source(raw)),
            },
        }
    }

    /// Returns the identifier used in audit records.
    #[must_use]
    pub fn audit_resource(&self) -> &str {
        self.document_id.as_deref().filter(|id| !id.is_empty()).unwrap_or("unknown")
    }
}
