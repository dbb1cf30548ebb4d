// crates/retrieval-gate-core/src/runtime/time_window.rs
// ============================================================================
// Module: Retrieval Gate Time Window Evaluation
// Description: Evaluates document time restrictions against an instant.
// Purpose: Decide whether a document is readable at a given moment.
// Dependencies: time, crate::core::document
// ============================================================================

//! ## Overview
//! The evaluator never reads the wall clock; callers supply `now` and the
//! local offset used for hour-of-day and weekday checks. Validity bounds are
//! inclusive and compared as absolute instants.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;
use time::UtcOffset;

use crate::core::document::TimeRestrictions;
use crate::core::document::WindowBound;

// ============================================================================
// SECTION: Local Clock
// ============================================================================

/// Hour of day and weekday of an instant in a local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    /// Hour of day, `0..=23`.
    pub hour: u8,
    /// Day of week, `0..=6` with `0` = Sunday.
    pub weekday: u8,
}

impl LocalClock {
    /// Reads the local hour and weekday of `now`.
    #[must_use]
    pub fn at(now: OffsetDateTime, offset: UtcOffset) -> Self {
        let local = now.to_offset(offset);
        Self {
            hour: local.hour(),
            weekday: local.weekday().number_days_from_sunday(),
        }
    }
}

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Time window evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindowEvaluator;

impl TimeWindowEvaluator {
    /// Returns true when `now` falls inside the restrictions.
    ///
    /// Absent restrictions impose nothing. Unreadable bounds are never satisfied.
    #[must_use]
    pub fn evaluate(
        restrictions: Option<&TimeRestrictions>,
        now: OffsetDateTime,
        offset: UtcOffset,
    ) -> bool {
        let Some(restrictions) = restrictions else {
            return true;
        };
        if !bound_holds(restrictions.valid_from.as_ref(), |from| now >= from) {
            return false;
        }
        if !bound_holds(restrictions.valid_until.as_ref(), |until| now <= until) {
            return false;
        }
        let clock = LocalClock::at(now, offset);
        if restrictions.allowed_hours.as_ref().is_some_and(|hours| !hours.contains(&clock.hour)) {
            return false;
        }
        !restrictions.allowed_days.as_ref().is_some_and(|days| !days.contains(&clock.weekday))
    }
}

/// Applies `check` to a present bound; absent bounds hold, unreadable ones fail.
fn bound_holds(bound: Option<&WindowBound>, check: impl FnOnce(OffsetDateTime) -> bool) -> bool {
    match bound {
        None => true,
        Some(bound) => bound.instant().is_some_and(check),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
