// crates/retrieval-gate-core/src/runtime/axes.rs
// ============================================================================
// Module: Retrieval Gate Policy Axes
// Description: The nine policy axes and their ordered registry.
// Purpose: Define each axis once for both filter generation and re-validation.
// Dependencies: time, tracing, crate::core
// ============================================================================

//! ## Overview
//! Each [`PolicyAxis`] pairs a query-time clause with a result-time check.
//! [`PolicyFilterBuilder`](crate::runtime::PolicyFilterBuilder) folds the
//! clauses and [`DocumentAccessEvaluator`](crate::runtime::DocumentAccessEvaluator)
//! folds the checks, both over the same [`PolicyAxisRegistry`].
//!
//! # Invariants
//! - For every axis, `query_clause(user)` matches a document's raw source
//!   exactly when `check(document, user)` passes on its normalized record,
//!   except where the terms limit truncates a clause to match nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use time::OffsetDateTime;
use time::UtcOffset;

use crate::core::config::AccessPolicyConfig;
use crate::core::decision::AppliedRule;
use crate::core::document::DocumentRecord;
use crate::core::document::GRANT_ALL;
use crate::core::document::GRANT_PUBLIC;
use crate::core::document::fields;
use crate::core::filter::FilterExpression;
use crate::core::filter::TermValue;
use crate::core::hierarchy::ClassificationHierarchy;
use crate::core::hierarchy::RoleHierarchy;
use crate::core::permission::UserPermission;
use crate::runtime::time_window::LocalClock;
use crate::runtime::time_window::TimeWindowEvaluator;

// ============================================================================
// SECTION: Axis Context
// ============================================================================

/// Evaluation context shared by every axis for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisContext {
    /// Evaluation instant.
    pub now: OffsetDateTime,
    /// Offset used for hour-of-day and weekday checks.
    pub offset: UtcOffset,
    /// Maximum number of values in one `terms` leaf.
    pub max_filter_terms: usize,
}

impl AxisContext {
    /// Builds a context from policy settings.
    #[must_use]
    pub fn from_config(config: &AccessPolicyConfig, now: OffsetDateTime) -> Self {
        Self {
            now,
            offset: config.utc_offset(),
            max_filter_terms: config.max_filter_terms,
        }
    }

    /// Builds a `terms` leaf, truncating oversized value lists to match nothing.
    fn bounded_terms<I, V>(&self, field: &str, values: I) -> FilterExpression
    where
        I: IntoIterator<Item = V>,
        V: Into<TermValue>,
    {
        let values: Vec<TermValue> = values.into_iter().map(Into::into).collect();
        if values.len() > self.max_filter_terms {
            tracing::warn!(
                field,
                terms = values.len(),
                limit = self.max_filter_terms,
                "terms clause exceeds limit; clause will match nothing"
            );
            return FilterExpression::terms(field, Vec::<TermValue>::new());
        }
        FilterExpression::terms(field, values)
    }

    /// Builds `terms(field, values) OR missing(field)` under the terms limit.
    fn bounded_terms_or_missing<I, V>(&self, field: &str, values: I) -> FilterExpression
    where
        I: IntoIterator<Item = V>,
        V: Into<TermValue>,
    {
        FilterExpression::or(vec![
            self.bounded_terms(field, values),
            FilterExpression::missing(field),
        ])
    }
}

// ============================================================================
// SECTION: Axis Trait
// ============================================================================

/// One policy dimension, evaluated both at query time and at result time.
pub trait PolicyAxis: Send + Sync {
    /// Rule label recorded when the axis passes.
    fn id(&self) -> AppliedRule;

    /// Returns true when the axis is applicable to `user`.
    fn applies(&self, _user: &UserPermission) -> bool {
        true
    }

    /// Builds the query-time clause for `user`.
    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression;

    /// Checks a document, returning the denial reason on failure.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the axis is not satisfied.
    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        context: &AxisContext,
    ) -> Result<(), String>;
}

/// Returns true when a grant list names `subject` or is open to everyone.
fn grants(list: &BTreeSet<String>, subject: &str) -> bool {
    list.contains(subject) || list.contains(GRANT_PUBLIC) || list.contains(GRANT_ALL)
}

/// Returns true when a document set imposes no restriction or shares a value.
fn open_or_shared(document: &BTreeSet<String>, user: &BTreeSet<String>) -> bool {
    document.is_empty() || !document.is_disjoint(user)
}

/// Values accepted by a grant-list clause.
fn grant_terms(subject: &str) -> [&str; 3] {
    [subject, GRANT_PUBLIC, GRANT_ALL]
}

// ============================================================================
// SECTION: Axes
// ============================================================================

/// Identity axis over the direct grant list.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAxis;

impl PolicyAxis for IdentityAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::UserDirect
    }

    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression {
        context.bounded_terms(fields::USER_PERMISSIONS, grant_terms(&user.user_id))
    }

    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        _context: &AxisContext,
    ) -> Result<(), String> {
        if grants(&document.user_permissions, &user.user_id) {
            Ok(())
        } else {
            Err("User not in allowed list".to_string())
        }
    }
}

/// Organization axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationAxis;

impl PolicyAxis for OrganizationAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::Organization
    }

    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression {
        context.bounded_terms(fields::ALLOWED_ORGANIZATIONS, grant_terms(&user.organization))
    }

    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        _context: &AxisContext,
    ) -> Result<(), String> {
        if grants(&document.allowed_organizations, &user.organization) {
            Ok(())
        } else {
            Err("Organization not allowed".to_string())
        }
    }
}

/// Department axis; applicable only to users scoped to a department.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepartmentAxis;

impl PolicyAxis for DepartmentAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::Department
    }

    fn applies(&self, user: &UserPermission) -> bool {
        user.scoped_department().is_some()
    }

    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression {
        let department = user.scoped_department().unwrap_or_default();
        context.bounded_terms(fields::ALLOWED_DEPARTMENTS, grant_terms(department))
    }

    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        _context: &AxisContext,
    ) -> Result<(), String> {
        match user.scoped_department() {
            Some(department) if grants(&document.allowed_departments, department) => Ok(()),
            _ => Err("Department not allowed".to_string()),
        }
    }
}

/// Role-level axis over the role hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleLevelAxis;

impl PolicyAxis for RoleLevelAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::RoleLevel
    }

    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression {
        let labels = RoleHierarchy::resolve(user.role_level).iter().map(|role| role.as_str());
        context.bounded_terms_or_missing(fields::REQUIRED_ROLE_LEVEL, labels)
    }

    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        _context: &AxisContext,
    ) -> Result<(), String> {
        if RoleHierarchy::satisfies(user.role_level, &document.required_role_level) {
            Ok(())
        } else {
            Err(format!(
                "Insufficient role level: required {}, user has {}",
                document.required_role_level, user.role_level
            ))
        }
    }
}

/// Data-classification axis over the clearance hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataClassificationAxis;

impl PolicyAxis for DataClassificationAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::DataClassification
    }

    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression {
        let labels = ClassificationHierarchy::resolve(user.data_classification_level)
            .iter()
            .map(|level| level.as_str());
        context.bounded_terms_or_missing(fields::DATA_CLASSIFICATION, labels)
    }

    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        _context: &AxisContext,
    ) -> Result<(), String> {
        if ClassificationHierarchy::permits(
            user.data_classification_level,
            &document.data_classification,
        ) {
            Ok(())
        } else {
            Err(format!(
                "Insufficient data classification access: document is {}",
                document.data_classification
            ))
        }
    }
}

/// Tag axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagAxis;

impl PolicyAxis for TagAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::Tags
    }

    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression {
        context.bounded_terms_or_missing(fields::TAGS, user.accessible_tags.iter().cloned())
    }

    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        _context: &AxisContext,
    ) -> Result<(), String> {
        if open_or_shared(&document.tags, &user.accessible_tags) {
            Ok(())
        } else {
            Err("No matching tags".to_string())
        }
    }
}

/// Project axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectAxis;

impl PolicyAxis for ProjectAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::Projects
    }

    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression {
        context.bounded_terms_or_missing(fields::PROJECTS, user.accessible_projects.iter().cloned())
    }

    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        _context: &AxisContext,
    ) -> Result<(), String> {
        if open_or_shared(&document.projects, &user.accessible_projects) {
            Ok(())
        } else {
            Err("No matching projects".to_string())
        }
    }
}

/// Geography axis; users without regions are unrestricted.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicAxis;

impl PolicyAxis for GeographicAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::Geographic
    }

    fn query_clause(&self, user: &UserPermission, context: &AxisContext) -> FilterExpression {
        match &user.geographic_restrictions {
            None => FilterExpression::MatchAll,
            Some(regions) => context
                .bounded_terms_or_missing(fields::GEOGRAPHIC_RESTRICTIONS, regions.iter().cloned()),
        }
    }

    fn check(
        &self,
        document: &DocumentRecord,
        user: &UserPermission,
        _context: &AxisContext,
    ) -> Result<(), String> {
        let passes = user
            .geographic_restrictions
            .as_ref()
            .is_none_or(|regions| open_or_shared(&document.geographic_restrictions, regions));
        if passes { Ok(()) } else { Err("Geographic restrictions not met".to_string()) }
    }
}

/// Time-window axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindowAxis;

impl PolicyAxis for TimeWindowAxis {
    fn id(&self) -> AppliedRule {
        AppliedRule::TimeRestrictions
    }

    fn query_clause(&self, _user: &UserPermission, context: &AxisContext) -> FilterExpression {
        let now = context.now;
        let clock = LocalClock::at(now, context.offset);
        FilterExpression::or(vec![
            FilterExpression::missing(fields::TIME_RESTRICTIONS),
            FilterExpression::and(vec![
                FilterExpression::or(vec![
                    FilterExpression::missing(fields::VALID_FROM),
                    FilterExpression::range(fields::VALID_FROM, None, Some(now)),
                ]),
                FilterExpression::or(vec![
                    FilterExpression::missing(fields::VALID_UNTIL),
                    FilterExpression::range(fields::VALID_UNTIL, Some(now), None),
                ]),
                FilterExpression::terms_or_missing(fields::ALLOWED_HOURS, [i64::from(clock.hour)]),
                FilterExpression::terms_or_missing(
                    fields::ALLOWED_DAYS,
                    [i64::from(clock.weekday)],
                ),
            ]),
        ])
    }

    fn check(
        &self,
        document: &DocumentRecord,
        _user: &UserPermission,
        context: &AxisContext,
    ) -> Result<(), String> {
        if TimeWindowEvaluator::evaluate(
            document.time_restrictions.as_ref(),
            context.now,
            context.offset,
        ) {
            Ok(())
        } else {
            Err("Time restrictions not met".to_string())
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered list of policy axes.
pub struct PolicyAxisRegistry {
    /// Axes in evaluation order.
    axes: Vec<Box<dyn PolicyAxis>>,
}

impl PolicyAxisRegistry {
    /// Returns the nine standard axes in evaluation order.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            axes: vec![
                Box::new(IdentityAxis),
                Box::new(OrganizationAxis),
                Box::new(DepartmentAxis),
                Box::new(RoleLevelAxis),
                Box::new(DataClassificationAxis),
                Box::new(TagAxis),
                Box::new(ProjectAxis),
                Box::new(GeographicAxis),
                Box::new(TimeWindowAxis),
            ],
        }
    }

    /// Returns every axis in evaluation order.
    #[must_use]
    pub fn axes(&self) -> &[Box<dyn PolicyAxis>] {
        &self.axes
    }

    /// Iterates the axes applicable to `user`, in evaluation order.
    pub fn applicable<'a>(
        &'a self,
        user: &'a UserPermission,
    ) -> impl Iterator<Item = &'a dyn PolicyAxis> + 'a {
        self.axes.iter().map(Box::as_ref).filter(move |axis| axis.applies(user))
    }

    /// Returns the rule labels of every axis, in evaluation order.
    #[must_use]
    pub fn ids(&self) -> Vec<AppliedRule> {
        self.axes.iter().map(|axis| axis.id()).collect()
    }
}

impl Default for PolicyAxisRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for PolicyAxisRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyAxisRegistry").field("axes", &self.ids()).finish()
    }
}
