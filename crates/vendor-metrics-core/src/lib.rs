// crates/vendor-metrics-core/src/lib.rs
// ============================================================================
// Module: Vendor Metrics Core Library
// Description: Public API surface for the vendor metrics core.
// Purpose: Expose records, store interfaces, metric functions, and the service.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Vendor metrics core models vendors and their purchase orders, derives
//! per-vendor performance metrics from purchase order lifecycle events and
//! keeps an append-only history of those metrics. It is backend-agnostic and
//! reaches persistence only through [`VendorStore`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::SharedVendorStore;
pub use interfaces::StoreError;
pub use interfaces::StoreTransaction;
pub use interfaces::TransactionWork;
pub use interfaces::VendorStore;
pub use interfaces::with_transaction;
pub use runtime::Acknowledgement;
pub use runtime::InMemoryVendorStore;
pub use runtime::LedgerError;
pub use runtime::MAX_VENDOR_NAME_LENGTH;
pub use runtime::MetricKind;
pub use runtime::PurchaseOrderRemoval;
pub use runtime::PurchaseOrderUpdate;
pub use runtime::SnapshotTrigger;
pub use runtime::VendorService;
