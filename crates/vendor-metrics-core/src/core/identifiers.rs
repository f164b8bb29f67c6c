// crates/vendor-metrics-core/src/core/identifiers.rs
// ============================================================================
// Module: Vendor Metrics Identifiers
// Description: Canonical opaque identifiers for vendors and purchase orders.
// Purpose: Provide strongly typed, serializable keys with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Vendors are keyed by their vendor code and purchase orders by their PO
//! number. Both identifiers are opaque and serialize as plain strings. Length
//! and emptiness checks happen in the service layer, not in these wrappers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted identifier length in characters.
pub const MAX_IDENTIFIER_LENGTH: usize = 50;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Unique vendor code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorCode(String);

impl VendorCode {
    /// Creates a new vendor code.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VendorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for VendorCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Unique purchase order number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoNumber(String);

impl PoNumber {
    /// Creates a new purchase order number.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PoNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
