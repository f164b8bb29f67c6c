// crates/vendor-metrics-core/src/interfaces/mod.rs
// ============================================================================
// Module: Vendor Metrics Interfaces
// Description: Backend-agnostic persistence interfaces.
// Purpose: Define the transactional store contract used by the service.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Persistence is reached through [`VendorStore::transact`], which hands a
//! [`StoreTransaction`] to caller-supplied work and commits only when that
//! work succeeds. Every read and write of one service operation happens
//! inside a single transaction, so metric recomputation and the snapshot that
//! follows it are applied atomically or not at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::HistoricalPerformance;
use crate::core::PoNumber;
use crate::core::PurchaseOrder;
use crate::core::Vendor;
use crate::core::VendorCode;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Vendor store errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store I/O error.
    #[error("vendor store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("vendor store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("vendor store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("vendor store invalid data: {0}")]
    Invalid(String),
    /// A uniqueness or reference constraint was violated.
    #[error("vendor store conflict: {0}")]
    Conflict(String),
    /// Caller work aborted the transaction.
    #[error("vendor store transaction aborted: {0}")]
    Aborted(String),
    /// Store reported an error.
    #[error("vendor store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Store Traits
// ============================================================================

/// Read and write access scoped to one open transaction.
pub trait StoreTransaction {
    /// Loads a vendor by code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn vendor(&self, code: &VendorCode) -> Result<Option<Vendor>, StoreError>;

    /// Lists all vendors ordered by code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn vendors(&self) -> Result<Vec<Vendor>, StoreError>;

    /// Inserts a new vendor.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the code already exists.
    fn insert_vendor(&mut self, vendor: &Vendor) -> Result<(), StoreError>;

    /// Replaces an existing vendor record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the vendor does not exist.
    fn update_vendor(&mut self, vendor: &Vendor) -> Result<(), StoreError>;

    /// Deletes a vendor together with its purchase orders and history.
    ///
    /// Returns `false` when no vendor had that code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn delete_vendor(&mut self, code: &VendorCode) -> Result<bool, StoreError>;

    /// Loads a purchase order by number.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn purchase_order(&self, number: &PoNumber) -> Result<Option<PurchaseOrder>, StoreError>;

    /// Lists purchase orders ordered by number, optionally for one vendor.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn purchase_orders(
        &self,
        vendor: Option<&VendorCode>,
    ) -> Result<Vec<PurchaseOrder>, StoreError>;

    /// Inserts a new purchase order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the number already exists or the
    /// vendor is unknown.
    fn insert_purchase_order(&mut self, order: &PurchaseOrder) -> Result<(), StoreError>;

    /// Replaces an existing purchase order record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the order does not exist.
    fn update_purchase_order(&mut self, order: &PurchaseOrder) -> Result<(), StoreError>;

    /// Deletes a purchase order. Returns `false` when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn delete_purchase_order(&mut self, number: &PoNumber) -> Result<bool, StoreError>;

    /// Appends a historical performance snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn append_history(&mut self, record: &HistoricalPerformance) -> Result<(), StoreError>;

    /// Lists a vendor's snapshots in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn history(&self, vendor: &VendorCode) -> Result<Vec<HistoricalPerformance>, StoreError>;
}

/// Unit of work executed inside a store transaction.
pub type TransactionWork<'a> =
    dyn FnMut(&mut dyn StoreTransaction) -> Result<(), StoreError> + 'a;

/// Transactional persistence backend for vendor records.
pub trait VendorStore: Send + Sync {
    /// Runs `work` inside one transaction.
    ///
    /// Changes made by `work` are committed only when it returns `Ok`; any
    /// error discards them.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or [`StoreError`] when the
    /// transaction cannot be opened or committed.
    fn transact(&self, work: &mut TransactionWork<'_>) -> Result<(), StoreError>;
}

/// Shared vendor store handle for cross-thread usage.
#[derive(Clone)]
pub struct SharedVendorStore {
    /// Inner store implementation.
    inner: Arc<dyn VendorStore>,
}

impl SharedVendorStore {
    /// Wraps a vendor store in a shared handle.
    #[must_use]
    pub fn from_store(store: impl VendorStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(inner: Arc<dyn VendorStore>) -> Self {
        Self {
            inner,
        }
    }
}

impl VendorStore for SharedVendorStore {
    fn transact(&self, work: &mut TransactionWork<'_>) -> Result<(), StoreError> {
        self.inner.transact(work)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs typed work inside a store transaction and returns its output.
///
/// A domain error returned by `work` aborts the transaction and is handed
/// back unchanged; store failures convert through `E: From<StoreError>`.
///
/// # Errors
///
/// Returns the error produced by `work`, or the converted store error when
/// the transaction itself fails.
pub fn with_transaction<S, T, E, F>(store: &S, mut work: F) -> Result<T, E>
where
    S: VendorStore + ?Sized,
    E: From<StoreError>,
    F: FnMut(&mut dyn StoreTransaction) -> Result<T, E>,
{
    let mut output: Option<T> = None;
    let mut failure: Option<E> = None;
    let result = store.transact(&mut |tx: &mut dyn StoreTransaction| match work(tx) {
        Ok(value) => {
            output = Some(value);
            Ok(())
        }
        Err(err) => {
            failure = Some(err);
            Err(StoreError::Aborted("operation failed".to_string()))
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }
    result.map_err(E::from)?;
    output.ok_or_else(|| E::from(StoreError::Store("transaction produced no output".to_string())))
}
