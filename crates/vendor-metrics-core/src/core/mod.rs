// crates/vendor-metrics-core/src/core/mod.rs
// ============================================================================
// Module: Vendor Metrics Core Types
// Description: Canonical records, identifiers, and time handling.
// Purpose: Provide stable, serializable types shared by stores and the API.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Core types define the vendor, purchase order, and historical performance
//! records together with their identifiers and datetime codec. These types
//! are the canonical source of truth for the HTTP surface and both stores.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod records;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::MAX_IDENTIFIER_LENGTH;
pub use identifiers::PoNumber;
pub use identifiers::VendorCode;
pub use records::HistoricalPerformance;
pub use records::PURCHASE_ORDER_REQUIRED_FIELDS;
pub use records::PerformanceMetrics;
pub use records::PurchaseOrder;
pub use records::PurchaseOrderPatch;
pub use records::PurchaseOrderStatus;
pub use records::VENDOR_REQUIRED_FIELDS;
pub use records::Vendor;
pub use records::VendorPatch;
pub use records::missing_fields;
pub use self::time::Clock;
pub use self::time::ManualClock;
pub use self::time::SystemClock;
pub use self::time::TimeError;
