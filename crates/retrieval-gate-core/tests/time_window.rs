// crates/retrieval-gate-core/tests/time_window.rs
// ============================================================================
// Module: Time Window Tests
// Description: Validity bounds, hour-of-day and weekday gating.
// ============================================================================
//! ## Overview
//! Covers absent restrictions, inclusive bounds, local offsets and
//! unreadable stored values.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::collections::BTreeSet;

use retrieval_gate_core::TimeRestrictions;
use retrieval_gate_core::TimeWindowEvaluator;
use retrieval_gate_core::WindowBound;
use time::UtcOffset;
use time::macros::datetime;
use time::macros::offset;

use crate::common::NOW;

fn hours(values: &[u8]) -> Option<BTreeSet<u8>> {
    Some(values.iter().copied().collect())
}

fn evaluate(restrictions: &TimeRestrictions) -> bool {
    TimeWindowEvaluator::evaluate(Some(restrictions), NOW, UtcOffset::UTC)
}

#[test]
fn absent_restrictions_pass() {
    assert!(TimeWindowEvaluator::evaluate(None, NOW, UtcOffset::UTC));
    assert!(evaluate(&TimeRestrictions::default()));
}

#[test]
fn future_valid_from_fails() {
    let restrictions = TimeRestrictions {
        valid_from: Some(WindowBound::At(datetime!(2026-01-01 0:00 UTC))),
        ..TimeRestrictions::default()
    };
    assert!(!evaluate(&restrictions));
}

#[test]
fn past_valid_until_fails() {
    let restrictions = TimeRestrictions {
        valid_until: Some(WindowBound::At(datetime!(2025-03-05 14:29:59 UTC))),
        ..TimeRestrictions::default()
    };
    assert!(!evaluate(&restrictions));
}

#[test]
fn bounds_are_inclusive() {
    let restrictions = TimeRestrictions {
        valid_from: Some(WindowBound::At(NOW)),
        valid_until: Some(WindowBound::At(NOW)),
        ..TimeRestrictions::default()
    };
    assert!(evaluate(&restrictions));
}

#[test]
fn bounds_compare_instants_across_offsets() {
    let restrictions = TimeRestrictions {
        valid_from: Some(WindowBound::parse("2025-03-05T16:00:00+02:00")),
        ..TimeRestrictions::default()
    };
    assert!(evaluate(&restrictions));
}

#[test]
fn unreadable_bounds_never_pass() {
    let restrictions = TimeRestrictions {
        valid_from: Some(WindowBound::parse("yesterday")),
        ..TimeRestrictions::default()
    };
    assert!(!evaluate(&restrictions));
    let restrictions = TimeRestrictions {
        valid_until: Some(WindowBound::parse("forever")),
        ..TimeRestrictions::default()
    };
    assert!(!evaluate(&restrictions));
}

#[test]
fn allowed_hours_gate_on_local_hour() {
    let inside = TimeRestrictions {
        allowed_hours: hours(&[9, 14, 17]),
        ..TimeRestrictions::default()
    };
    let outside = TimeRestrictions {
        allowed_hours: hours(&[9, 10]),
        ..TimeRestrictions::default()
    };
    assert!(evaluate(&inside));
    assert!(!evaluate(&outside));
}

#[test]
fn allowed_days_count_from_sunday() {
    let wednesday = TimeRestrictions {
        allowed_days: hours(&[3]),
        ..TimeRestrictions::default()
    };
    let weekend = TimeRestrictions {
        allowed_days: hours(&[0, 6]),
        ..TimeRestrictions::default()
    };
    assert!(evaluate(&wednesday));
    assert!(!evaluate(&weekend));
}

#[test]
fn present_but_empty_lists_deny() {
    let restrictions = TimeRestrictions {
        allowed_hours: hours(&[]),
        ..TimeRestrictions::default()
    };
    assert!(!evaluate(&restrictions));
}

#[test]
fn local_offset_moves_hour_and_weekday() {
    // 14:30 UTC on Wednesday is 23:30 on Wednesday at +09:00, 00:30 Thursday at +10:00.
    let late_wednesday = TimeRestrictions {
        allowed_hours: hours(&[23]),
        allowed_days: hours(&[3]),
        ..TimeRestrictions::default()
    };
    assert!(TimeWindowEvaluator::evaluate(Some(&late_wednesday), NOW, offset!(+09:00)));
    assert!(!TimeWindowEvaluator::evaluate(Some(&late_wednesday), NOW, offset!(+10:00)));
}
