// crates/vendor-metrics-cli/src/serve_policy.rs
// ============================================================================
// Module: Serve Policy
// Description: Operator opt-in for exposing the API beyond loopback.
// Purpose: Require an explicit flag or env var before a network-facing bind.
// Dependencies: vendor-metrics-config, std
// ============================================================================

//! ## Overview
//! A loaded [`VendorMetricsConfig`] has already been validated, so an exposed
//! bind always carries token auth. This module adds the launcher's own gate:
//! the operator must pass `--allow-non-loopback` or set
//! [`ALLOW_NON_LOOPBACK_ENV`] before `serve` listens on a routable address.

use std::env;
use std::net::SocketAddr;

use vendor_metrics_config::ServerAuthMode;
use vendor_metrics_config::VendorMetricsConfig;

use crate::t;

/// Environment variable opting in to non-loopback binds.
pub const ALLOW_NON_LOOPBACK_ENV: &str = "VENDOR_METRICS_ALLOW_NON_LOOPBACK";

/// Where the server will listen and how exposed that is.
#[derive(Debug, Clone)]
pub struct BindExposure {
    /// Validated listen address.
    pub bind_addr: SocketAddr,
    /// True when the address is reachable from other hosts.
    pub network_exposed: bool,
    /// Auth mode callers will face.
    pub auth_mode: ServerAuthMode,
    /// Whether audit events are written.
    pub audit_enabled: bool,
}

/// Reasons `serve` refuses to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServePolicyError {
    /// The opt-in env var holds something other than a boolean.
    InvalidEnv {
        /// Raw environment value.
        value: String,
    },
    /// The bind address failed to parse.
    InvalidBind {
        /// Raw bind value.
        bind: String,
    },
    /// The bind is routable and the operator did not opt in.
    OptInRequired {
        /// Requested bind address.
        bind: SocketAddr,
    },
}

impl std::fmt::Display for ServePolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::InvalidEnv {
                value,
            } => t!("serve.bind.allow_env_invalid", env = ALLOW_NON_LOOPBACK_ENV, value = value),
            Self::InvalidBind {
                bind,
            } => t!("serve.bind.parse_failed", bind = bind),
            Self::OptInRequired {
                bind,
            } => t!("serve.bind.non_loopback_opt_in", bind = bind, env = ALLOW_NON_LOOPBACK_ENV),
        };
        write!(f, "{message}")
    }
}

/// Returns true when the flag is set or the env var holds a true value.
///
/// # Errors
/// Returns [`ServePolicyError::InvalidEnv`] when the env var is not a boolean.
pub fn resolve_allow_non_loopback(flag: bool) -> Result<bool, ServePolicyError> {
    if flag {
        return Ok(true);
    }
    env::var_os(ALLOW_NON_LOOPBACK_ENV)
        .map_or(Ok(false), |value| parse_opt_in(&value.to_string_lossy()))
}

/// Classifies the configured bind and applies the opt-in gate.
///
/// # Errors
/// Returns [`ServePolicyError::OptInRequired`] for a routable bind without
/// opt-in and [`ServePolicyError::InvalidBind`] when the address is unusable.
pub fn check_exposure(
    config: &VendorMetricsConfig,
    allow_non_loopback: bool,
) -> Result<BindExposure, ServePolicyError> {
    let bind_addr = config.server.bind_addr().map_err(|_| ServePolicyError::InvalidBind {
        bind: config.server.bind.clone(),
    })?;
    let network_exposed = !bind_addr.ip().is_loopback();
    if network_exposed && !allow_non_loopback {
        return Err(ServePolicyError::OptInRequired {
            bind: bind_addr,
        });
    }
    Ok(BindExposure {
        bind_addr,
        network_exposed,
        auth_mode: config.server.auth_mode(),
        audit_enabled: config.server.audit.enabled,
    })
}

/// Parses true/false/1/0/yes/no/on/off, ignoring case and padding.
fn parse_opt_in(value: &str) -> Result<bool, ServePolicyError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ServePolicyError::InvalidEnv {
            value: value.to_string(),
        }),
    }
}
