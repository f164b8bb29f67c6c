// crates/vendor-metrics-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for vendor-metrics-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use vendor_metrics_config::ConfigError;
use vendor_metrics_config::ServerAuthConfig;
use vendor_metrics_config::VendorMetricsConfig;

/// Result type for tests that report failures as strings.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `VendorMetricsConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<VendorMetricsConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<VendorMetricsConfig, toml::de::Error> {
    config_from_toml("")
}

/// Returns a minimal config with the provided auth config.
pub fn config_with_auth(auth: ServerAuthConfig) -> Result<VendorMetricsConfig, toml::de::Error> {
    let mut config = minimal_config()?;
    config.server.auth = Some(auth);
    Ok(config)
}

/// Checks that validation failed with a message containing `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}
