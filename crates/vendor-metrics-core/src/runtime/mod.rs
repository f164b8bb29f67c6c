// crates/vendor-metrics-core/src/runtime/mod.rs
// ============================================================================
// Module: Vendor Metrics Runtime
// Description: Metric functions, in-memory store, and the vendor service.
// Purpose: Execute vendor operations against a transactional store.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules hold the metric arithmetic, the in-memory store and the
//! [`VendorService`] that ties them together. Every HTTP handler and CLI path
//! calls into the same service so the trigger policy lives in one place.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod metrics;
pub mod service;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use metrics::MetricKind;
pub use service::Acknowledgement;
pub use service::LedgerError;
pub use service::MAX_VENDOR_NAME_LENGTH;
pub use service::PurchaseOrderRemoval;
pub use service::PurchaseOrderUpdate;
pub use service::SnapshotTrigger;
pub use service::VendorService;
pub use store::InMemoryVendorStore;
