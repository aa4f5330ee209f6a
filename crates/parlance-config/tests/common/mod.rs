// crates/parlance-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for parlance-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::io::Write;

use parlance_config::ConfigError;
use parlance_config::ParlanceConfig;
use tempfile::NamedTempFile;

/// Standard result type for config tests.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `ParlanceConfig` without validation.
pub fn config_from_toml(toml_str: &str) -> Result<ParlanceConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Writes `contents` to a temp file and loads it.
pub fn load_str(contents: &str) -> Result<Result<ParlanceConfig, ConfigError>, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents.as_bytes()).map_err(|err| err.to_string())?;
    Ok(ParlanceConfig::load(Some(file.path())))
}

/// Asserts that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
