// crates/vendor-metrics-cli/src/lib.rs
// ============================================================================
// Module: Vendor Metrics CLI Library
// Description: Shared helpers for the vendor metrics command-line interface.
// Purpose: Provide the message catalog and bind policy to the binary and tests.
// Dependencies: vendor-metrics-config
// ============================================================================

//! ## Overview
//! This library houses the CLI message catalog and the network exposure policy
//! applied before `serve` binds a listener. The binary entry point
//! (`src/main.rs`) routes all user-facing output through [`t!`].

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and translation helpers.
pub mod i18n;
/// Bind safety checks for `serve`.
pub mod serve_policy;
