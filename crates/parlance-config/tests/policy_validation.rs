//! Policy selection tests for parlance-config.
// crates/parlance-config/tests/policy_validation.rs
// =============================================================================
// Module: Config Policy Validation Tests
// Description: Cross-field rules and the runtime objects built from config.
// Purpose: Ensure every accepted config maps to the intended policy set.
// =============================================================================

#![allow(clippy::use_debug, reason = "Test-only diagnostics are permitted.")]

mod common;

use common::TestResult;
use common::assert_invalid;
use common::config_from_toml;
use parlance_config::ArgumentStyle;
use parlance_config::AuditSinkKind;
use parlance_config::NameStyle;
use parlance_config::ResultMode;
use parlance_core::ArgumentAdapter;
use parlance_core::ArgumentPolicy;
use parlance_core::ComponentTransformer;
use parlance_core::FormatStyle;
use parlance_core::NameResolver;
use parlance_core::ResultPolicy;

/// Transformer with no registrations.
fn plain_transformer() -> ComponentTransformer {
    ComponentTransformer::default()
}

#[test]
fn defaults_select_named_declared_no_operation() -> TestResult {
    let config = config_from_toml("").map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.arguments.style != ArgumentStyle::Named
        || config.result.mode != ResultMode::NoOperation
        || config.audit.sink != AuditSinkKind::None
    {
        return Err(format!("unexpected defaults: {config:?}"));
    }
    let built = config.invocation_configuration(ArgumentAdapter::standard(), plain_transformer());
    match (built.argument_policy(), built.result_policy()) {
        (ArgumentPolicy::Named(policy), ResultPolicy::NoOperation)
            if matches!(policy.names(), NameResolver::Declared) =>
        {
            Ok(())
        }
        other => Err(format!("unexpected policies: {other:?}")),
    }
}

#[test]
fn full_config_maps_to_policies() -> TestResult {
    let config = config_from_toml(
        r#"
[arguments]
style = "named"
names = "declared_or_identifier"

[result]
mode = "standard"
"#,
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.arguments.names != Some(NameStyle::DeclaredOrIdentifier) {
        return Err("names must parse as declared_or_identifier".to_string());
    }
    let built = config.invocation_configuration(ArgumentAdapter::standard(), plain_transformer());
    match (built.argument_policy(), built.result_policy()) {
        (ArgumentPolicy::Named(policy), ResultPolicy::Standard(_))
            if matches!(policy.names(), NameResolver::DeclaredOrIdentifier) =>
        {
            Ok(())
        }
        other => Err(format!("unexpected policies: {other:?}")),
    }
}

#[test]
fn positional_style_maps_to_positional_policy() -> TestResult {
    let config =
        config_from_toml("[arguments]\nstyle = \"positional\"\n").map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if FormatStyle::from(config.arguments.style) != FormatStyle::Positional {
        return Err("style must convert to positional".to_string());
    }
    let built = config.invocation_configuration(ArgumentAdapter::standard(), plain_transformer());
    if matches!(built.argument_policy(), ArgumentPolicy::Positional(_)) {
        Ok(())
    } else {
        Err(format!("unexpected argument policy {:?}", built.argument_policy()))
    }
}

#[test]
fn names_with_positional_style_are_rejected() -> TestResult {
    let config = config_from_toml("[arguments]\nstyle = \"positional\"\nnames = \"declared\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "arguments.names is only valid with named style")
}

#[test]
fn file_sink_requires_non_empty_path() -> TestResult {
    let missing = config_from_toml("[audit]\nsink = \"file\"\n").map_err(|err| err.to_string())?;
    assert_invalid(missing.validate(), "audit.path is required")?;
    let blank = config_from_toml("[audit]\nsink = \"file\"\npath = \"  \"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(blank.validate(), "audit.path must be non-empty")
}

#[test]
fn audit_path_uses_config_path_limits() -> TestResult {
    let toml = format!("[audit]\nsink = \"file\"\npath = \"logs/{}.log\"\n", "a".repeat(300));
    let config = config_from_toml(&toml).map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "audit.path component too long")
}

#[test]
fn path_without_file_sink_is_rejected() -> TestResult {
    let config = config_from_toml("[audit]\nsink = \"stderr\"\npath = \"audit.log\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "audit.path is only valid when audit.sink is file")
}

#[test]
fn file_sink_opens_configured_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("binding.log");
    let mut config = config_from_toml("[audit]\nsink = \"file\"\n").map_err(|err| err.to_string())?;
    config.audit.path = Some(path.to_string_lossy().into_owned());
    config.validate().map_err(|err| err.to_string())?;
    config.audit_sink().map_err(|err| err.to_string())?;
    if path.exists() { Ok(()) } else { Err("file sink must create the log".to_string()) }
}

#[test]
fn unopenable_audit_path_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("missing").join("binding.log");
    let mut config = config_from_toml("[audit]\nsink = \"file\"\n").map_err(|err| err.to_string())?;
    config.audit.path = Some(path.to_string_lossy().into_owned());
    assert_invalid(config.audit_sink(), "config io error")
}
