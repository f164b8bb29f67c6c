// crates/vendor-metrics-config/src/lib.rs
// ============================================================================
// Module: Vendor Metrics Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for vendor-metrics.toml semantics.
// Dependencies: vendor-metrics-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `vendor-metrics-config` defines the configuration model for the vendor
//! metrics server and validates it fail-closed before anything binds a
//! socket or opens a database.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
