// crates/vendor-metrics-core/src/runtime/service.rs
// ============================================================================
// Module: Vendor Service
// Description: Transactional vendor and purchase order operations.
// Purpose: Apply record mutations, metric recalculation, and snapshots atomically.
// Dependencies: crate::{core, interfaces, runtime::metrics}, serde, thiserror
// ============================================================================

//! ## Overview
//! [`VendorService`] is the only writer of vendor metrics. Every operation
//! runs inside one store transaction: the record mutation, the metric
//! recalculation it triggers and the snapshot that follows either all commit
//! or none do.
//!
//! Trigger policy for purchase order operations:
//! - create: no recalculation, no snapshot
//! - update: quality and fulfillment recalculated only when the status moves
//!   into `completed`; a snapshot is always appended
//! - acknowledge: response time recalculated and snapshot appended, unless the
//!   order was already acknowledged
//! - delete: response time, fulfillment and quality recalculated over the
//!   remaining orders; snapshot appended

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::Clock;
use crate::core::HistoricalPerformance;
use crate::core::MAX_IDENTIFIER_LENGTH;
use crate::core::PerformanceMetrics;
use crate::core::PoNumber;
use crate::core::PurchaseOrder;
use crate::core::PurchaseOrderPatch;
use crate::core::SystemClock;
use crate::core::Vendor;
use crate::core::VendorCode;
use crate::core::VendorPatch;
use crate::interfaces::SharedVendorStore;
use crate::interfaces::StoreError;
use crate::interfaces::StoreTransaction;
use crate::interfaces::with_transaction;
use crate::runtime::metrics;
use crate::runtime::metrics::MetricKind;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum vendor name length in characters.
pub const MAX_VENDOR_NAME_LENGTH: usize = 100;

/// Metrics refreshed when an order transitions into `completed`.
const COMPLETION_METRICS: &[MetricKind] = &[MetricKind::QualityRating, MetricKind::FulfillmentRate];
/// Metrics refreshed when an order is acknowledged.
const ACKNOWLEDGEMENT_METRICS: &[MetricKind] = &[MetricKind::ResponseTime];
/// Metrics refreshed after an order is deleted.
const DELETION_METRICS: &[MetricKind] =
    &[MetricKind::ResponseTime, MetricKind::FulfillmentRate, MetricKind::QualityRating];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Vendor service errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Vendor code does not exist.
    #[error("vendor not found: {0}")]
    VendorNotFound(String),
    /// Purchase order number does not exist.
    #[error("purchase order not found: {0}")]
    PurchaseOrderNotFound(String),
    /// Purchase order references a vendor that does not exist.
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),
    /// Request payload failed validation.
    #[error("{0}")]
    Invalid(String),
    /// Record already exists.
    #[error("{0}")]
    Conflict(String),
    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Operation that appended a performance snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotTrigger {
    /// Purchase order update.
    Update,
    /// Purchase order acknowledgement.
    Acknowledge,
    /// Purchase order deletion.
    Delete,
}

impl SnapshotTrigger {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Acknowledge => "acknowledge",
            Self::Delete => "delete",
        }
    }
}

/// Result of a purchase order update.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderUpdate {
    /// Order as stored after the update.
    pub order: PurchaseOrder,
    /// Snapshot appended for the owning vendor.
    pub snapshot: HistoricalPerformance,
    /// True when the update completed the order and metrics were recalculated.
    pub metrics_recomputed: bool,
}

/// Result of an acknowledgement request.
#[derive(Debug, Clone, PartialEq)]
pub enum Acknowledgement {
    /// The acknowledgement date was set.
    Acknowledged {
        /// Order as stored after acknowledgement.
        order: PurchaseOrder,
        /// Snapshot appended for the owning vendor.
        snapshot: HistoricalPerformance,
    },
    /// The order already carried an acknowledgement date; nothing changed.
    AlreadyAcknowledged {
        /// Order as stored.
        order: PurchaseOrder,
    },
}

/// Result of a purchase order deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderRemoval {
    /// Deleted order.
    pub order: PurchaseOrder,
    /// Snapshot appended for the owning vendor.
    pub snapshot: HistoricalPerformance,
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Transactional vendor and purchase order operations.
#[derive(Clone)]
pub struct VendorService {
    /// Backing store.
    store: SharedVendorStore,
    /// Timestamp source for acknowledgements and snapshots.
    clock: Arc<dyn Clock>,
}

impl VendorService {
    /// Creates a service over `store` using `clock` for timestamps.
    #[must_use]
    pub fn new(store: SharedVendorStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
        }
    }

    /// Creates a service that reads the system clock.
    #[must_use]
    pub fn with_system_clock(store: SharedVendorStore) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    // ------------------------------------------------------------------------
    // Vendors
    // ------------------------------------------------------------------------

    /// Creates a vendor.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Invalid`] for malformed fields and
    /// [`LedgerError::Conflict`] when the code is already taken.
    pub fn create_vendor(&self, vendor: &Vendor) -> Result<(), LedgerError> {
        validate_identifier("vendor_code", vendor.vendor_code.as_str())?;
        validate_vendor_name(&vendor.name)?;
        with_transaction(&self.store, |tx| {
            if tx.vendor(&vendor.vendor_code)?.is_some() {
                return Err(LedgerError::Conflict(format!(
                    "vendor with vendor_code {} already exists",
                    vendor.vendor_code
                )));
            }
            tx.insert_vendor(vendor)?;
            Ok(())
        })
    }

    /// Lists all vendors ordered by code.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] when the read fails.
    pub fn list_vendors(&self) -> Result<Vec<Vendor>, LedgerError> {
        with_transaction(&self.store, |tx| Ok(tx.vendors()?))
    }

    /// Loads one vendor.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::VendorNotFound`] for an unknown code.
    pub fn get_vendor(&self, code: &VendorCode) -> Result<Vendor, LedgerError> {
        with_transaction(&self.store, |tx| require_vendor(tx, code))
    }

    /// Returns the vendor's four current metrics.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::VendorNotFound`] for an unknown code.
    pub fn vendor_performance(&self, code: &VendorCode) -> Result<PerformanceMetrics, LedgerError> {
        self.get_vendor(code).map(|vendor| vendor.metrics)
    }

    /// Applies a partial update to a vendor and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::VendorNotFound`] for an unknown code and
    /// [`LedgerError::Invalid`] when the patch tries to change the code.
    pub fn update_vendor(
        &self,
        code: &VendorCode,
        patch: VendorPatch,
    ) -> Result<Vendor, LedgerError> {
        if let Some(requested) = &patch.vendor_code
            && requested != code
        {
            return Err(LedgerError::Invalid("vendor_code cannot be changed".to_string()));
        }
        if let Some(name) = &patch.name {
            validate_vendor_name(name)?;
        }
        with_transaction(&self.store, |tx| {
            let mut vendor = require_vendor(tx, code)?;
            patch.clone().apply(&mut vendor);
            tx.update_vendor(&vendor)?;
            Ok(vendor)
        })
    }

    /// Deletes a vendor with its purchase orders and history.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::VendorNotFound`] for an unknown code.
    pub fn delete_vendor(&self, code: &VendorCode) -> Result<(), LedgerError> {
        with_transaction(&self.store, |tx| {
            if tx.delete_vendor(code)? {
                Ok(())
            } else {
                Err(LedgerError::VendorNotFound(code.to_string()))
            }
        })
    }

    /// Lists the vendor's snapshots in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::VendorNotFound`] for an unknown code.
    pub fn history(&self, code: &VendorCode) -> Result<Vec<HistoricalPerformance>, LedgerError> {
        with_transaction(&self.store, |tx| {
            require_vendor(tx, code)?;
            Ok(tx.history(code)?)
        })
    }

    // ------------------------------------------------------------------------
    // Purchase Orders
    // ------------------------------------------------------------------------

    /// Creates a purchase order. No metrics are recalculated.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownVendor`] when the vendor does not exist
    /// and [`LedgerError::Conflict`] when the number is already taken.
    pub fn create_purchase_order(&self, order: &PurchaseOrder) -> Result<(), LedgerError> {
        validate_identifier("po_number", order.po_number.as_str())?;
        with_transaction(&self.store, |tx| {
            if tx.vendor(&order.vendor)?.is_none() {
                return Err(LedgerError::UnknownVendor(order.vendor.to_string()));
            }
            if tx.purchase_order(&order.po_number)?.is_some() {
                return Err(LedgerError::Conflict(format!(
                    "purchase order with po_number {} already exists",
                    order.po_number
                )));
            }
            tx.insert_purchase_order(order)?;
            Ok(())
        })
    }

    /// Lists purchase orders ordered by number, optionally for one vendor.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::VendorNotFound`] when the filter names an
    /// unknown vendor.
    pub fn list_purchase_orders(
        &self,
        vendor: Option<&VendorCode>,
    ) -> Result<Vec<PurchaseOrder>, LedgerError> {
        with_transaction(&self.store, |tx| {
            if let Some(code) = vendor {
                require_vendor(tx, code)?;
            }
            Ok(tx.purchase_orders(vendor)?)
        })
    }

    /// Loads one purchase order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PurchaseOrderNotFound`] for an unknown number.
    pub fn get_purchase_order(&self, number: &PoNumber) -> Result<PurchaseOrder, LedgerError> {
        with_transaction(&self.store, |tx| require_purchase_order(tx, number))
    }

    /// Applies an update to a purchase order.
    ///
    /// Fields absent from the patch keep their stored values, except the
    /// quality rating and acknowledgement date, which are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PurchaseOrderNotFound`] for an unknown number
    /// and [`LedgerError::Invalid`] when the patch changes `po_number` or
    /// `vendor`.
    pub fn update_purchase_order(
        &self,
        number: &PoNumber,
        patch: PurchaseOrderPatch,
    ) -> Result<PurchaseOrderUpdate, LedgerError> {
        if let Some(requested) = &patch.po_number
            && requested != number
        {
            return Err(LedgerError::Invalid("po_number cannot be changed".to_string()));
        }
        let now = self.clock.now();
        with_transaction(&self.store, |tx| {
            let mut order = require_purchase_order(tx, number)?;
            if let Some(requested) = &patch.vendor
                && *requested != order.vendor
            {
                return Err(LedgerError::Invalid("vendor cannot be changed".to_string()));
            }
            let was_completed = order.is_completed();
            patch.clone().apply(&mut order);
            tx.update_purchase_order(&order)?;
            let metrics_recomputed = !was_completed && order.is_completed();
            let kinds: &[MetricKind] = if metrics_recomputed { COMPLETION_METRICS } else { &[] };
            let snapshot = refresh_vendor(tx, &order.vendor, kinds, now)?;
            Ok(PurchaseOrderUpdate {
                order,
                snapshot,
                metrics_recomputed,
            })
        })
    }

    /// Sets the acknowledgement date to now unless it is already set.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PurchaseOrderNotFound`] for an unknown number.
    pub fn acknowledge_purchase_order(
        &self,
        number: &PoNumber,
    ) -> Result<Acknowledgement, LedgerError> {
        let now = self.clock.now();
        with_transaction(&self.store, |tx| {
            let mut order = require_purchase_order(tx, number)?;
            if order.acknowledgement_date.is_some() {
                return Ok(Acknowledgement::AlreadyAcknowledged {
                    order,
                });
            }
            order.acknowledgement_date = Some(now);
            tx.update_purchase_order(&order)?;
            let snapshot = refresh_vendor(tx, &order.vendor, ACKNOWLEDGEMENT_METRICS, now)?;
            Ok(Acknowledgement::Acknowledged {
                order,
                snapshot,
            })
        })
    }

    /// Deletes a purchase order and recalculates the owner's metrics.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PurchaseOrderNotFound`] for an unknown number.
    pub fn delete_purchase_order(
        &self,
        number: &PoNumber,
    ) -> Result<PurchaseOrderRemoval, LedgerError> {
        let now = self.clock.now();
        with_transaction(&self.store, |tx| {
            let order = require_purchase_order(tx, number)?;
            tx.delete_purchase_order(number)?;
            let snapshot = refresh_vendor(tx, &order.vendor, DELETION_METRICS, now)?;
            Ok(PurchaseOrderRemoval {
                order,
                snapshot,
            })
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads a vendor or reports it missing.
fn require_vendor(tx: &dyn StoreTransaction, code: &VendorCode) -> Result<Vendor, LedgerError> {
    tx.vendor(code)?.ok_or_else(|| LedgerError::VendorNotFound(code.to_string()))
}

/// Loads a purchase order or reports it missing.
fn require_purchase_order(
    tx: &dyn StoreTransaction,
    number: &PoNumber,
) -> Result<PurchaseOrder, LedgerError> {
    tx.purchase_order(number)?.ok_or_else(|| LedgerError::PurchaseOrderNotFound(number.to_string()))
}

/// Recalculates `kinds` for the vendor, persists it, and appends a snapshot.
fn refresh_vendor(
    tx: &mut dyn StoreTransaction,
    code: &VendorCode,
    kinds: &[MetricKind],
    now: OffsetDateTime,
) -> Result<HistoricalPerformance, LedgerError> {
    let mut vendor = require_vendor(tx, code)?;
    if !kinds.is_empty() {
        let orders = tx.purchase_orders(Some(code))?;
        metrics::recalculate(&mut vendor, &orders, kinds);
        tx.update_vendor(&vendor)?;
    }
    let record = metrics::snapshot(&vendor, now);
    tx.append_history(&record)?;
    Ok(record)
}

/// Rejects empty or over-long identifiers.
fn validate_identifier(field: &str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::Invalid(format!("{field} must not be empty")));
    }
    if value.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(LedgerError::Invalid(format!(
            "{field} exceeds {MAX_IDENTIFIER_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Rejects over-long vendor names.
fn validate_vendor_name(name: &str) -> Result<(), LedgerError> {
    if name.chars().count() > MAX_VENDOR_NAME_LENGTH {
        return Err(LedgerError::Invalid(format!(
            "name exceeds {MAX_VENDOR_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
