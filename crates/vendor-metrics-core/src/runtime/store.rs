// crates/vendor-metrics-core/src/runtime/store.rs
// ============================================================================
// Module: Vendor Metrics In-Memory Store
// Description: Simple in-memory vendor store for tests and local runs.
// Purpose: Provide a transactional store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`VendorStore`].
//! Each transaction works on a staged copy of the state and swaps it in on
//! success, so a failed transaction leaves no trace. The mutex is held for
//! the whole transaction, which serializes writers. It is not durable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::HistoricalPerformance;
use crate::core::PoNumber;
use crate::core::PurchaseOrder;
use crate::core::Vendor;
use crate::core::VendorCode;
use crate::interfaces::StoreError;
use crate::interfaces::StoreTransaction;
use crate::interfaces::TransactionWork;
use crate::interfaces::VendorStore;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Complete store contents.
#[derive(Debug, Default, Clone)]
struct MemoryState {
    /// Vendors keyed by code.
    vendors: BTreeMap<String, Vendor>,
    /// Purchase orders keyed by number.
    orders: BTreeMap<String, PurchaseOrder>,
    /// Append-only snapshot log.
    history: Vec<HistoricalPerformance>,
}

/// In-memory vendor store for tests and local runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVendorStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryVendorStore {
    /// Creates a new, empty in-memory vendor store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }
}

impl VendorStore for InMemoryVendorStore {
    fn transact(&self, work: &mut TransactionWork<'_>) -> Result<(), StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("vendor store mutex poisoned".to_string()))?;
        let mut staged = guard.clone();
        work(&mut staged)?;
        *guard = staged;
        drop(guard);
        Ok(())
    }
}

impl StoreTransaction for MemoryState {
    fn vendor(&self, code: &VendorCode) -> Result<Option<Vendor>, StoreError> {
        Ok(self.vendors.get(code.as_str()).cloned())
    }

    fn vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        Ok(self.vendors.values().cloned().collect())
    }

    fn insert_vendor(&mut self, vendor: &Vendor) -> Result<(), StoreError> {
        let key = vendor.vendor_code.as_str();
        if self.vendors.contains_key(key) {
            return Err(StoreError::Conflict(format!("vendor {key} already exists")));
        }
        self.vendors.insert(key.to_string(), vendor.clone());
        Ok(())
    }

    fn update_vendor(&mut self, vendor: &Vendor) -> Result<(), StoreError> {
        let Some(slot) = self.vendors.get_mut(vendor.vendor_code.as_str()) else {
            return Err(StoreError::Invalid(format!(
                "vendor {} does not exist",
                vendor.vendor_code
            )));
        };
        *slot = vendor.clone();
        Ok(())
    }

    fn delete_vendor(&mut self, code: &VendorCode) -> Result<bool, StoreError> {
        if self.vendors.remove(code.as_str()).is_none() {
            return Ok(false);
        }
        self.orders.retain(|_, order| order.vendor != *code);
        self.history.retain(|record| record.vendor != *code);
        Ok(true)
    }

    fn purchase_order(&self, number: &PoNumber) -> Result<Option<PurchaseOrder>, StoreError> {
        Ok(self.orders.get(number.as_str()).cloned())
    }

    fn purchase_orders(
        &self,
        vendor: Option<&VendorCode>,
    ) -> Result<Vec<PurchaseOrder>, StoreError> {
        Ok(self
            .orders
            .values()
            .filter(|order| vendor.is_none_or(|code| order.vendor == *code))
            .cloned()
            .collect())
    }

    fn insert_purchase_order(&mut self, order: &PurchaseOrder) -> Result<(), StoreError> {
        let key = order.po_number.as_str();
        if self.orders.contains_key(key) {
            return Err(StoreError::Conflict(format!("purchase order {key} already exists")));
        }
        if !self.vendors.contains_key(order.vendor.as_str()) {
            return Err(StoreError::Conflict(format!(
                "purchase order references unknown vendor {}",
                order.vendor
            )));
        }
        self.orders.insert(key.to_string(), order.clone());
        Ok(())
    }

    fn update_purchase_order(&mut self, order: &PurchaseOrder) -> Result<(), StoreError> {
        let Some(slot) = self.orders.get_mut(order.po_number.as_str()) else {
            return Err(StoreError::Invalid(format!(
                "purchase order {} does not exist",
                order.po_number
            )));
        };
        *slot = order.clone();
        Ok(())
    }

    fn delete_purchase_order(&mut self, number: &PoNumber) -> Result<bool, StoreError> {
        Ok(self.orders.remove(number.as_str()).is_some())
    }

    fn append_history(&mut self, record: &HistoricalPerformance) -> Result<(), StoreError> {
        if !self.vendors.contains_key(record.vendor.as_str()) {
            return Err(StoreError::Conflict(format!(
                "snapshot references unknown vendor {}",
                record.vendor
            )));
        }
        self.history.push(record.clone());
        Ok(())
    }

    fn history(&self, vendor: &VendorCode) -> Result<Vec<HistoricalPerformance>, StoreError> {
        Ok(self.history.iter().filter(|record| record.vendor == *vendor).cloned().collect())
    }
}
