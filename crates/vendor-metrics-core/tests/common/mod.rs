// crates/vendor-metrics-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Shared fixtures for vendor metrics core tests.
// Purpose: Reduce duplication across integration tests for vendor-metrics-core.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::Arc;

use serde_json::Map;
use serde_json::json;
use time::OffsetDateTime;
use time::macros::datetime;
use vendor_metrics_core::InMemoryVendorStore;
use vendor_metrics_core::ManualClock;
use vendor_metrics_core::PerformanceMetrics;
use vendor_metrics_core::PoNumber;
use vendor_metrics_core::PurchaseOrder;
use vendor_metrics_core::PurchaseOrderStatus;
use vendor_metrics_core::SharedVendorStore;
use vendor_metrics_core::Vendor;
use vendor_metrics_core::VendorCode;
use vendor_metrics_core::VendorService;

/// Fixed issue date used by fixture orders.
pub const ISSUED_AT: OffsetDateTime = datetime!(2024-05-06 12:00:00 UTC);

/// Builds a vendor with zeroed metrics.
pub fn vendor(code: &str) -> Vendor {
    Vendor {
        vendor_code: VendorCode::new(code),
        name: format!("Vendor {code}"),
        contact_details: format!("ops@{code}.test"),
        address: "1 Main St".to_string(),
        metrics: PerformanceMetrics::default(),
    }
}

/// Builds a pending order for `vendor` issued at [`ISSUED_AT`].
pub fn order(number: &str, vendor: &str) -> PurchaseOrder {
    let mut items = Map::new();
    items.insert("widget".to_string(), json!(3));
    PurchaseOrder {
        po_number: PoNumber::new(number),
        vendor: VendorCode::new(vendor),
        order_date: ISSUED_AT,
        delivery_date: ISSUED_AT,
        items,
        quantity: 3,
        status: PurchaseOrderStatus::Pending,
        quality_rating: None,
        issue_date: ISSUED_AT,
        acknowledgement_date: None,
    }
}

/// Returns a service over a fresh in-memory store plus its clock.
pub fn memory_service() -> (VendorService, Arc<ManualClock>) {
    service_over(SharedVendorStore::from_store(InMemoryVendorStore::new()))
}

/// Returns a service over `store` with a manual clock at [`ISSUED_AT`].
pub fn service_over(store: SharedVendorStore) -> (VendorService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(ISSUED_AT));
    let service = VendorService::new(store, clock.clone());
    (service, clock)
}
