// crates/vendor-metrics-core/tests/store.rs
// ============================================================================
// Module: In-Memory Store Tests
// Description: Tests for the in-memory vendor store implementation.
// Purpose: Validate commit, rollback, and cascade behavior.
// Dependencies: vendor-metrics-core
// ============================================================================
//! ## Overview
//! Ensures the in-memory store commits only successful transactions and
//! enforces key and reference constraints.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use vendor_metrics_core::InMemoryVendorStore;
use vendor_metrics_core::LedgerError;
use vendor_metrics_core::PoNumber;
use vendor_metrics_core::StoreError;
use vendor_metrics_core::VendorCode;
use vendor_metrics_core::with_transaction;

use crate::common::order;
use crate::common::vendor;

#[test]
fn failed_work_leaves_store_unchanged() {
    let store = InMemoryVendorStore::new();
    let result: Result<(), LedgerError> = with_transaction(&store, |tx| {
        tx.insert_vendor(&vendor("V001"))?;
        tx.insert_purchase_order(&order("PO1", "V001"))?;
        Err(LedgerError::Invalid("late failure".to_string()))
    });
    assert_eq!(result, Err(LedgerError::Invalid("late failure".to_string())));

    let vendors = with_transaction(&store, |tx| Ok::<_, StoreError>(tx.vendors()?)).unwrap();
    assert!(vendors.is_empty());
}

#[test]
fn successful_work_commits() {
    let store = InMemoryVendorStore::new();
    with_transaction(&store, |tx| {
        tx.insert_vendor(&vendor("V001"))?;
        tx.insert_purchase_order(&order("PO1", "V001"))
    })
    .unwrap();
    let loaded =
        with_transaction(&store, |tx| tx.purchase_order(&PoNumber::new("PO1"))).unwrap();
    assert_eq!(loaded, Some(order("PO1", "V001")));
}

#[test]
fn constraint_violations_are_conflicts() {
    let store = InMemoryVendorStore::new();
    let orphan = with_transaction(&store, |tx| tx.insert_purchase_order(&order("PO1", "V404")));
    assert!(matches!(orphan, Err(StoreError::Conflict(_))));

    let duplicate = with_transaction(&store, |tx| {
        tx.insert_vendor(&vendor("V001"))?;
        tx.insert_vendor(&vendor("V001"))
    });
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));
}

#[test]
fn update_of_missing_record_is_invalid() {
    let store = InMemoryVendorStore::new();
    let result = with_transaction(&store, |tx| tx.update_vendor(&vendor("V001")));
    assert!(matches!(result, Err(StoreError::Invalid(_))));
}

#[test]
fn delete_vendor_cascades_to_orders() {
    let store = InMemoryVendorStore::new();
    with_transaction(&store, |tx| {
        tx.insert_vendor(&vendor("V001"))?;
        tx.insert_vendor(&vendor("V002"))?;
        tx.insert_purchase_order(&order("PO1", "V001"))?;
        tx.insert_purchase_order(&order("PO2", "V002"))
    })
    .unwrap();
    let code = VendorCode::new("V001");
    let deleted = with_transaction(&store, |tx| tx.delete_vendor(&code)).unwrap();
    assert!(deleted);
    let remaining = with_transaction(&store, |tx| tx.purchase_orders(None)).unwrap();
    assert_eq!(remaining, vec![order("PO2", "V002")]);
    let again = with_transaction(&store, |tx| tx.delete_vendor(&code)).unwrap();
    assert!(!again);
}
