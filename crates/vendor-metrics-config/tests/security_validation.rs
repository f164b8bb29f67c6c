//! Security config validation tests for vendor-metrics-config.
// crates/vendor-metrics-config/tests/security_validation.rs
// =============================================================================
// Module: Security Config Validation Tests
// Description: Validate bind, auth, and body limit constraints.
// Purpose: Ensure the server cannot be configured into an open posture.
// =============================================================================

use vendor_metrics_config::MAX_AUTH_TOKEN_LENGTH;
use vendor_metrics_config::MAX_AUTH_TOKENS;
use vendor_metrics_config::ServerAuthConfig;
use vendor_metrics_config::ServerAuthMode;

mod common;

use common::TestResult;
use common::assert_invalid;

fn token_auth(tokens: Vec<String>) -> ServerAuthConfig {
    ServerAuthConfig {
        mode: ServerAuthMode::Token,
        tokens,
    }
}

#[test]
fn non_loopback_bind_requires_auth() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = "0.0.0.0:8080".to_string();
    assert_invalid(config.validate(), "non-loopback bind disallowed without auth policy")?;

    let auth = token_auth(vec!["secret".to_string()]);
    let mut config = common::config_with_auth(auth).map_err(|err| err.to_string())?;
    config.server.bind = "0.0.0.0:8080".to_string();
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn invalid_bind_address_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = "localhost".to_string();
    assert_invalid(config.validate(), "invalid bind address")?;
    config.server.bind = "  ".to_string();
    assert_invalid(config.validate(), "server.bind must be set")
}

#[test]
fn zero_body_limit_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.max_body_bytes = 0;
    assert_invalid(config.validate(), "max_body_bytes must be greater than zero")
}

#[test]
fn token_mode_requires_tokens() -> TestResult {
    let config = common::config_with_auth(token_auth(Vec::new())).map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "token auth requires tokens")
}

#[test]
fn token_limits_enforced() -> TestResult {
    let too_many = (0 ..= MAX_AUTH_TOKENS).map(|index| format!("token-{index}")).collect();
    let config = common::config_with_auth(token_auth(too_many)).map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "too many auth tokens")?;

    let too_long = vec!["t".repeat(MAX_AUTH_TOKEN_LENGTH + 1)];
    let config = common::config_with_auth(token_auth(too_long)).map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "auth token too long")?;

    let spaced = vec!["two words".to_string()];
    let config = common::config_with_auth(token_auth(spaced)).map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "auth token must not contain whitespace")?;

    let blank = vec![String::new()];
    let config = common::config_with_auth(token_auth(blank)).map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "auth token must be non-empty")
}

#[test]
fn blank_audit_path_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.audit.path = Some(" ".to_string());
    assert_invalid(config.validate(), "audit.path must be non-empty")
}
