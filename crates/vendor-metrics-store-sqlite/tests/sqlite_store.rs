// crates/vendor-metrics-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Store Tests
// Description: Validate SQLite VendorStore behavior.
// Purpose: Ensure durable persistence, rollback, and schema checks.
// Dependencies: vendor-metrics-store-sqlite, vendor-metrics-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Conformance tests for the SQLite-backed vendor store. Exercises
//! persistence across reopen, transactional rollback, cascades and schema
//! version enforcement, and runs the vendor service end to end on disk.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use serde_json::Map;
use serde_json::json;
use tempfile::TempDir;
use time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;
use vendor_metrics_core::Acknowledgement;
use vendor_metrics_core::LedgerError;
use vendor_metrics_core::ManualClock;
use vendor_metrics_core::PerformanceMetrics;
use vendor_metrics_core::PoNumber;
use vendor_metrics_core::PurchaseOrder;
use vendor_metrics_core::PurchaseOrderPatch;
use vendor_metrics_core::PurchaseOrderStatus;
use vendor_metrics_core::SharedVendorStore;
use vendor_metrics_core::StoreError;
use vendor_metrics_core::Vendor;
use vendor_metrics_core::VendorCode;
use vendor_metrics_core::VendorService;
use vendor_metrics_core::with_transaction;
use vendor_metrics_store_sqlite::SqliteStoreConfig;
use vendor_metrics_store_sqlite::SqliteStoreError;
use vendor_metrics_store_sqlite::SqliteVendorStore;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const ISSUED_AT: OffsetDateTime = datetime!(2024-05-06 12:00:00.250 UTC);

fn open(path: &Path) -> SqliteVendorStore {
    SqliteVendorStore::new(&SqliteStoreConfig::at_path(path)).unwrap()
}

fn vendor(code: &str) -> Vendor {
    Vendor {
        vendor_code: VendorCode::new(code),
        name: format!("Vendor {code}"),
        contact_details: "ops@example.test".to_string(),
        address: "1 Main St".to_string(),
        metrics: PerformanceMetrics {
            on_time_delivery_rate: 0.5,
            ..PerformanceMetrics::default()
        },
    }
}

fn order(number: &str, vendor: &str) -> PurchaseOrder {
    let mut items = Map::new();
    items.insert("widget".to_string(), json!({"sku": "W-1", "count": 3}));
    PurchaseOrder {
        po_number: PoNumber::new(number),
        vendor: VendorCode::new(vendor),
        order_date: ISSUED_AT,
        delivery_date: ISSUED_AT + Duration::days(4),
        items,
        quantity: 3,
        status: PurchaseOrderStatus::Pending,
        quality_rating: Some(3.5),
        issue_date: ISSUED_AT,
        acknowledgement_date: None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store.db");
    {
        let store = open(&path);
        with_transaction(&store, |tx| {
            tx.insert_vendor(&vendor("V001"))?;
            tx.insert_purchase_order(&order("PO1", "V001"))
        })
        .unwrap();
    }
    let store = open(&path);
    let loaded = with_transaction(&store, |tx| tx.purchase_order(&PoNumber::new("PO1"))).unwrap();
    assert_eq!(loaded, Some(order("PO1", "V001")));
    let vendors = with_transaction(&store, |tx| tx.vendors()).unwrap();
    assert_eq!(vendors, vec![vendor("V001")]);
}

#[test]
fn failed_work_rolls_back() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir.path().join("store.db"));
    let result: Result<(), LedgerError> = with_transaction(&store, |tx| {
        tx.insert_vendor(&vendor("V001"))?;
        Err(LedgerError::Invalid("late failure".to_string()))
    });
    assert!(result.is_err());
    let vendors = with_transaction(&store, |tx| tx.vendors()).unwrap();
    assert!(vendors.is_empty());
}

#[test]
fn constraint_violations_are_conflicts() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir.path().join("store.db"));
    let orphan = with_transaction(&store, |tx| tx.insert_purchase_order(&order("PO1", "V404")));
    assert!(matches!(orphan, Err(StoreError::Conflict(_))));
    let duplicate = with_transaction(&store, |tx| {
        tx.insert_vendor(&vendor("V001"))?;
        tx.insert_vendor(&vendor("V001"))
    });
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));
    let missing = with_transaction(&store, |tx| tx.update_vendor(&vendor("V002")));
    assert!(matches!(missing, Err(StoreError::Invalid(_))));
}

#[test]
fn vendor_delete_cascades() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir.path().join("store.db"));
    let (service, _) = service_over(store.clone());
    service.create_vendor(&vendor("V001")).unwrap();
    service.create_purchase_order(&order("PO1", "V001")).unwrap();
    service.acknowledge_purchase_order(&PoNumber::new("PO1")).unwrap();
    service.delete_vendor(&VendorCode::new("V001")).unwrap();

    let orders = with_transaction(&store, |tx| tx.purchase_orders(None)).unwrap();
    assert!(orders.is_empty());
    let history =
        with_transaction(&store, |tx| tx.history(&VendorCode::new("V001"))).unwrap();
    assert!(history.is_empty());
}

#[test]
fn rejects_unsupported_schema_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");
    drop(open(&path));
    let connection = rusqlite::Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = 99", []).unwrap();
    drop(connection);
    let result = SqliteVendorStore::new(&SqliteStoreConfig::at_path(&path));
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn rejects_directory_path() {
    let dir = TempDir::new().unwrap();
    let result = SqliteVendorStore::new(&SqliteStoreConfig::at_path(dir.path()));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn corrupt_items_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");
    let store = open(&path);
    with_transaction(&store, |tx| {
        tx.insert_vendor(&vendor("V001"))?;
        tx.insert_purchase_order(&order("PO1", "V001"))
    })
    .unwrap();
    drop(store);
    let connection = rusqlite::Connection::open(&path).unwrap();
    connection.execute("UPDATE purchase_orders SET items_json = 'not json'", []).unwrap();
    drop(connection);
    let store = open(&path);
    let loaded = with_transaction(&store, |tx| tx.purchase_order(&PoNumber::new("PO1")));
    assert!(matches!(loaded, Err(StoreError::Corrupt(_))));
}

#[test]
fn service_runs_trigger_policy_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir.path().join("store.db"));
    let (service, clock) = service_over(store);
    let code = VendorCode::new("V001");
    let number = PoNumber::new("PO1");
    service.create_vendor(&vendor("V001")).unwrap();
    service.create_purchase_order(&order("PO1", "V001")).unwrap();

    clock.advance(Duration::milliseconds(1500));
    let outcome = service.acknowledge_purchase_order(&number).unwrap();
    assert!(matches!(outcome, Acknowledgement::Acknowledged { .. }));
    let metrics = service.vendor_performance(&code).unwrap();
    assert_eq!(metrics.average_response_time, 1.5);

    let complete: PurchaseOrderPatch =
        serde_json::from_value(json!({"status": "completed", "quality_rating": 4.0})).unwrap();
    let update = service.update_purchase_order(&number, complete).unwrap();
    assert!(update.metrics_recomputed);
    assert_eq!(update.snapshot.metrics.quality_rating_avg, 4.0);
    assert_eq!(update.snapshot.metrics.fulfillment_rate, 1.0);

    service.delete_purchase_order(&number).unwrap();
    let history = service.history(&code).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].metrics.average_response_time, 1.5);
    assert_eq!(history[2].metrics.fulfillment_rate, 0.0);
    assert_eq!(history[2].date, ISSUED_AT + Duration::milliseconds(1500));
}

fn service_over(store: SqliteVendorStore) -> (VendorService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(ISSUED_AT));
    let service = VendorService::new(SharedVendorStore::from_store(store), clock.clone());
    (service, clock)
}
