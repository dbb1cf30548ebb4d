//! Config defaults and validation tests for retrieval-gate-config.
// crates/retrieval-gate-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Defaults and Validation Tests
// Description: Validate default behavior and range limits.
// Purpose: Ensure an empty config is valid and limits are enforced.
// =============================================================================

use retrieval_gate_config::MAX_CACHE_ENTRIES;
use retrieval_gate_config::MAX_CHUNK_SIZE;
use retrieval_gate_config::MAX_FILTER_TERMS;
use retrieval_gate_config::parse_utc_offset;
use retrieval_gate_core::AccessPolicyConfig;
use retrieval_gate_core::BatchMode;

mod common;

use crate::common::assert_invalid;

type TestResult = Result<(), String>;

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn defaults_match_core_settings() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    let settings = config.policy_settings().map_err(|err| err.to_string())?;
    if settings != AccessPolicyConfig::default() {
        return Err("policy settings differ from core defaults".to_string());
    }
    if config.batch_mode() != BatchMode::Sequential {
        return Err("batch mode should default to sequential".to_string());
    }
    if config.policy_cache().is_none() {
        return Err("cache should be enabled by default".to_string());
    }
    Ok(())
}

#[test]
fn partial_sections_keep_other_defaults() -> TestResult {
    let config = common::config_from_toml("[policy]\nadmin_bypass = true\n")
        .map_err(|err| err.to_string())?;
    let settings = config.policy_settings().map_err(|err| err.to_string())?;
    if !settings.admin_bypass || !settings.default_deny || !settings.enabled {
        return Err("admin_bypass override lost other defaults".to_string());
    }
    Ok(())
}

#[test]
fn utc_offset_converts_to_seconds() -> TestResult {
    let config = common::config_from_toml("[policy]\nutc_offset = \"-05:30\"\n")
        .map_err(|err| err.to_string())?;
    let settings = config.policy_settings().map_err(|err| err.to_string())?;
    if settings.utc_offset_seconds != -(5 * 3_600 + 30 * 60) {
        return Err(format!("unexpected offset: {}", settings.utc_offset_seconds));
    }
    Ok(())
}

#[test]
fn malformed_utc_offset_is_rejected() -> TestResult {
    for raw in ["05:00", "+5", "UTC", "+99:00", ""] {
        assert_invalid(parse_utc_offset(raw), "policy.utc_offset")?;
    }
    let config = common::config_from_toml("[policy]\nutc_offset = \"local\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "policy.utc_offset")
}

#[test]
fn cache_capacity_limits_are_enforced() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.cache.max_entries = 0;
    assert_invalid(config.validate(), "cache.max_entries")?;
    config.cache.max_entries = MAX_CACHE_ENTRIES + 1;
    assert_invalid(config.validate(), "cache.max_entries")?;
    config.cache.max_entries = MAX_CACHE_ENTRIES;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn chunk_size_limits_are_enforced() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.batch.chunk_size = 0;
    assert_invalid(config.validate(), "batch.chunk_size")?;
    config.batch.chunk_size = MAX_CHUNK_SIZE + 1;
    assert_invalid(config.validate(), "batch.chunk_size")
}

#[test]
fn filter_term_limits_are_enforced() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.limits.max_filter_terms = MAX_FILTER_TERMS + 1;
    assert_invalid(config.validate(), "limits.max_filter_terms")?;
    config.limits.max_filter_terms = 0;
    assert_invalid(config.validate(), "limits.max_filter_terms")
}

#[test]
fn parallel_batches_carry_chunk_size() -> TestResult {
    let config = common::config_from_toml("[batch]\nparallel = true\nchunk_size = 25\n")
        .map_err(|err| err.to_string())?;
    if config.batch_mode() != (BatchMode::Parallel { chunk_size: 25 }) {
        return Err("parallel batch mode expected".to_string());
    }
    Ok(())
}

#[test]
fn disabled_cache_yields_no_handle() -> TestResult {
    let config = common::config_from_toml("[cache]\nenabled = false\n")
        .map_err(|err| err.to_string())?;
    if config.policy_cache().is_some() {
        return Err("cache handle should be absent".to_string());
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_parse_error() -> TestResult {
    assert_invalid(common::config_from_toml("[policy\n"), "config parse error")?;
    assert_invalid(common::config_from_toml("[policy]\nenabled = \"yes\"\n"), "parse error")
}
